use std::sync::Arc;
use std::time::Duration;

use kconsole_core::{AppConfig, ClusterConfig, ConsoleError, ConsoleResult};
use kconsole_domain::{ClusterHandle, StaticClusterRegistry};
use tracing::info;

use crate::connect_client::ConnectHttpClient;
use crate::rest_proxy_admin::RestProxyAdminClient;

/// 根据配置为单个集群创建客户端句柄
pub fn cluster_handle(config: &ClusterConfig) -> ConsoleResult<ClusterHandle> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);
    let mut handle = ClusterHandle::new(&config.name);

    if let Some(kafka) = &config.kafka {
        let admin = RestProxyAdminClient::new(kafka, timeout).map_err(|e| {
            ConsoleError::config_error(format!("cluster '{}' kafka: {e}", config.name))
        })?;
        handle = handle.with_admin(Arc::new(admin));
    }

    if let Some(connect) = &config.connect {
        let client = ConnectHttpClient::new(connect, timeout).map_err(|e| {
            ConsoleError::config_error(format!("cluster '{}' connect: {e}", config.name))
        })?;
        handle = handle.with_connect(Arc::new(client));
    }

    Ok(handle)
}

/// 启动时根据配置构建只读集群注册表
pub fn registry_from_config(config: &AppConfig) -> ConsoleResult<StaticClusterRegistry> {
    let mut registry = StaticClusterRegistry::new();
    for cluster in &config.clusters {
        registry = registry.register(cluster_handle(cluster)?);
        info!(
            cluster_name = %cluster.name,
            kafka_admin = cluster.kafka.is_some(),
            connect = cluster.connect.is_some(),
            "Cluster registered"
        );
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use kconsole_core::{ConnectClusterConfig, KafkaAdminConfig};
    use kconsole_domain::ClusterRegistry;

    use super::*;

    fn cluster(name: &str) -> ClusterConfig {
        ClusterConfig {
            name: name.to_string(),
            kafka: Some(KafkaAdminConfig {
                rest_proxy_url: "http://rest-proxy:8082".to_string(),
                cluster_id: "lkc-1".to_string(),
                username: None,
                password: None,
            }),
            connect: None,
            request_timeout_seconds: 15,
        }
    }

    #[test]
    fn test_registry_from_config() {
        let mut analytics = cluster("analytics");
        analytics.kafka = None;
        analytics.connect = Some(ConnectClusterConfig {
            url: "http://connect:8083".to_string(),
            username: None,
            password: None,
            token: Some("secret".to_string()),
        });

        let config = AppConfig {
            clusters: vec![cluster("prod"), analytics],
            ..Default::default()
        };

        let registry = registry_from_config(&config).unwrap();
        let clusters = registry.clusters();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].name, "analytics");
        assert!(clusters[0].has_connect);
        assert!(!clusters[0].has_kafka_admin);
        assert!(clusters[1].has_kafka_admin);
        assert!(registry.lookup("prod").is_ok());
    }

    #[test]
    fn test_invalid_url_names_cluster() {
        let mut broken = cluster("broken");
        if let Some(kafka) = broken.kafka.as_mut() {
            kafka.rest_proxy_url = "::not-a-url".to_string();
        }

        let err = cluster_handle(&broken).unwrap_err();
        assert!(err.to_string().contains("cluster 'broken' kafka"));
    }
}
