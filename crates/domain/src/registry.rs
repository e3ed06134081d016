use std::collections::BTreeMap;

use kconsole_core::ConsoleError;

use crate::entities::ClusterSummary;
use crate::errors::{ErrorClass, GatewayError};
use crate::ports::{ClusterHandle, ClusterRegistry};

/// 启动时构建、之后只读的集群注册表
#[derive(Debug, Default, Clone)]
pub struct StaticClusterRegistry {
    clusters: BTreeMap<String, ClusterHandle>,
}

impl StaticClusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同名集群后注册者覆盖先注册者
    pub fn register(mut self, handle: ClusterHandle) -> Self {
        self.clusters.insert(handle.name().to_string(), handle);
        self
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

impl ClusterRegistry for StaticClusterRegistry {
    fn lookup(&self, cluster_name: &str) -> Result<ClusterHandle, GatewayError> {
        self.clusters.get(cluster_name).cloned().ok_or_else(|| {
            let err = ConsoleError::cluster_not_found(cluster_name);
            let message = format!("Could not find cluster: {err}");
            GatewayError::new(err, ErrorClass::Lookup, message)
                .with_field("cluster_name", cluster_name)
        })
    }

    fn clusters(&self) -> Vec<ClusterSummary> {
        self.clusters.values().map(ClusterHandle::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ports::MockConnectClient;

    #[test]
    fn test_lookup_unknown_cluster() {
        let registry = StaticClusterRegistry::new().register(ClusterHandle::new("prod"));
        let err = registry.lookup("staging").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Lookup);
        assert_eq!(err.message(), "Could not find cluster: cluster 'staging' not found");
        assert_eq!(err.log_fields().get("cluster_name").unwrap(), "staging");
    }

    #[test]
    fn test_clusters_sorted_with_capabilities() {
        let registry = StaticClusterRegistry::new()
            .register(ClusterHandle::new("b").with_connect(Arc::new(MockConnectClient::new())))
            .register(ClusterHandle::new("a"));

        let clusters = registry.clusters();
        assert_eq!(registry.len(), 2);
        assert_eq!(clusters[0].name, "a");
        assert!(!clusters[0].has_connect);
        assert_eq!(clusters[1].name, "b");
        assert!(clusters[1].has_connect);
        assert!(!clusters[1].has_kafka_admin);
    }

    #[test]
    fn test_missing_client_is_lookup_error() {
        let registry = StaticClusterRegistry::new().register(ClusterHandle::new("prod"));
        let handle = registry.lookup("prod").unwrap();
        let err = handle.admin_client().err().unwrap();
        assert_eq!(err.class(), ErrorClass::Lookup);
        assert!(handle.connect_client().is_err());
    }
}
