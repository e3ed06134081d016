use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use kconsole_core::{ConsoleError, ConsoleResult};
use metrics::{counter, histogram};
use tracing::{debug, instrument, warn};

use crate::context::{Interrupted, RequestContext};
use crate::entities::{
    ClusterSummary, ConfigEntry, ConnectorInfo, CreateConnectorRequest,
    DescribeBrokerConfigRequest, PutConnectorConfigRequest,
};
use crate::errors::{ErrorClass, GatewayError, OperationResult};
use crate::kafka_error::KafkaProtocolError;
use crate::ports::ClusterRegistry;

use super::config_projector::project;

const DESCRIBE_BROKER_CONFIG: &str = "describe_broker_config";
const CREATE_CONNECTOR: &str = "create_connector";
const PUT_CONNECTOR_CONFIG: &str = "put_connector_config";

/// 集群操作网关
///
/// 每次调用相互独立、无状态：查找集群句柄，执行单个远端操作，并把失败归一化为 [`GatewayError`]。
/// 本层不做任何重试。
#[derive(Clone)]
pub struct ClusterOperationGateway {
    registry: Arc<dyn ClusterRegistry>,
}

impl ClusterOperationGateway {
    pub fn new(registry: Arc<dyn ClusterRegistry>) -> Self {
        Self { registry }
    }

    pub fn clusters(&self) -> Vec<ClusterSummary> {
        self.registry.clusters()
    }

    #[instrument(skip(self, ctx, request), fields(broker_id = request.broker_id))]
    pub async fn describe_broker_config(
        &self,
        ctx: &RequestContext,
        cluster_name: &str,
        request: DescribeBrokerConfigRequest,
    ) -> OperationResult<Vec<ConfigEntry>> {
        let started = Instant::now();
        let result = self
            .describe_broker_config_inner(ctx, cluster_name, request)
            .await;
        record_outcome(DESCRIBE_BROKER_CONFIG, started, &result);
        result
    }

    async fn describe_broker_config_inner(
        &self,
        ctx: &RequestContext,
        cluster_name: &str,
        request: DescribeBrokerConfigRequest,
    ) -> OperationResult<Vec<ConfigEntry>> {
        let admin = self.registry.lookup(cluster_name)?.admin_client()?;
        let broker_id = request.broker_id;

        let response = invoke(
            ctx,
            "Failed to request broker's config",
            ErrorClass::Unavailable,
            admin.describe_broker_config(ctx, broker_id, request.config_keys),
        )
        .await
        .map_err(|err| {
            err.with_field("cluster_name", cluster_name)
                .with_field("broker_id", broker_id)
        })?;

        // 单个 broker 的 describe 请求只会返回一个 resource
        let Some(resource) = response.resources.into_iter().next() else {
            return Err(GatewayError::new(
                anyhow!("broker describe config response was empty"),
                ErrorClass::ContractViolation,
                "Broker config response was empty",
            )
            .with_field("cluster_name", cluster_name)
            .with_field("broker_id", broker_id));
        };

        if let Err(protocol_err) = KafkaProtocolError::check(resource.error_code) {
            let protocol_err =
                protocol_err.with_broker_message(resource.error_message.as_deref());
            let message = format!("Failed to describe broker config resource: {protocol_err}");
            let retryable = protocol_err.retriable;
            return Err(GatewayError::new(protocol_err, ErrorClass::Protocol, message)
                .with_field("retryable", retryable)
                .with_field("cluster_name", cluster_name)
                .with_field("broker_id", broker_id)
                .with_field("error_code", resource.error_code));
        }

        let entries = project(&resource.configs).map_err(|err| {
            let message = format!("Failed to parse broker config response: {err}");
            GatewayError::new(err, ErrorClass::ContractViolation, message)
                .with_field("cluster_name", cluster_name)
                .with_field("broker_id", broker_id)
        })?;

        debug!(
            cluster_name,
            broker_id,
            config_count = entries.len(),
            "Described broker config"
        );
        Ok(entries)
    }

    #[instrument(skip(self, ctx, request), fields(connector_name = %request.name))]
    pub async fn create_connector(
        &self,
        ctx: &RequestContext,
        cluster_name: &str,
        request: CreateConnectorRequest,
    ) -> OperationResult<ConnectorInfo> {
        let started = Instant::now();
        let result = async {
            let connect = self.registry.lookup(cluster_name)?.connect_client()?;
            invoke(
                ctx,
                "Failed to create Connector",
                ErrorClass::RemoteCall,
                connect.create_connector(ctx, request),
            )
            .await
            .map_err(|err| err.with_field("cluster_name", cluster_name))
        }
        .await;
        record_outcome(CREATE_CONNECTOR, started, &result);
        result
    }

    #[instrument(skip(self, ctx, request))]
    pub async fn put_connector_config(
        &self,
        ctx: &RequestContext,
        cluster_name: &str,
        connector_name: &str,
        request: PutConnectorConfigRequest,
    ) -> OperationResult<ConnectorInfo> {
        let started = Instant::now();
        let result = async {
            let connect = self.registry.lookup(cluster_name)?.connect_client()?;
            invoke(
                ctx,
                "Failed to patch Connector config",
                ErrorClass::RemoteCall,
                connect.put_connector_config(ctx, connector_name, request),
            )
            .await
            .map_err(|err| {
                err.with_field("cluster_name", cluster_name)
                    .with_field("connector_name", connector_name)
            })
        }
        .await;
        record_outcome(PUT_CONNECTOR_CONFIG, started, &result);
        result
    }
}

/// 执行远端调用并与取消信号、截止时间竞争；失败时消息形如 `<prefix>: <err>`
async fn invoke<T, F>(
    ctx: &RequestContext,
    prefix: &str,
    failure_class: ErrorClass,
    call: F,
) -> OperationResult<T>
where
    F: Future<Output = ConsoleResult<T>>,
{
    match ctx.run(call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(remote_failure(prefix, failure_class, err)),
        Err(interrupted) => {
            let class = match interrupted {
                Interrupted::Cancelled => ErrorClass::Cancelled,
                Interrupted::DeadlineExceeded => ErrorClass::DeadlineExceeded,
            };
            warn!(%interrupted, "{prefix}");
            Err(GatewayError::new(
                interrupted,
                class,
                format!("{prefix}: {interrupted}"),
            ))
        }
    }
}

fn remote_failure(prefix: &str, class: ErrorClass, err: ConsoleError) -> GatewayError {
    let silent = err.is_silent();
    let retryable = err.is_retryable();
    let message = format!("{prefix}: {err}");
    GatewayError::new(err, class, message)
        .with_field("retryable", retryable)
        .silent(silent)
}

fn record_outcome<T>(operation: &'static str, started: Instant, result: &OperationResult<T>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(err) => err.class().as_str(),
    };
    counter!(
        "kconsole_gateway_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("kconsole_gateway_request_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use mockall::predicate::eq;

    use super::*;
    use crate::entities::{
        ConnectorTaskId, DescribeConfigsResource, DescribeConfigsResponse, RawConfigRecord,
        RawConfigSynonym, SourceKind, ValueType,
    };
    use crate::ports::{ClusterHandle, MockClusterRegistry, MockConnectClient, MockKafkaAdminClient};
    use crate::registry::StaticClusterRegistry;

    fn gateway_with(handle: ClusterHandle) -> ClusterOperationGateway {
        ClusterOperationGateway::new(Arc::new(StaticClusterRegistry::new().register(handle)))
    }

    fn admin_returning(response: DescribeConfigsResponse) -> MockKafkaAdminClient {
        let mut admin = MockKafkaAdminClient::new();
        admin
            .expect_describe_broker_config()
            .returning(move |_, _, _| Ok(response.clone()));
        admin
    }

    fn retention_resource(source: SourceKind) -> DescribeConfigsResource {
        DescribeConfigsResource {
            error_code: 0,
            error_message: None,
            resource_name: "1".to_string(),
            configs: vec![RawConfigRecord {
                name: "log.retention.ms".to_string(),
                value: Some("604800000".to_string()),
                source: source.code(),
                config_type: ValueType::Long.code(),
                is_default: true,
                read_only: false,
                is_sensitive: false,
                documentation: None,
                synonyms: vec![RawConfigSynonym {
                    name: "log.retention.ms".to_string(),
                    value: Some("604800000".to_string()),
                    source: SourceKind::DefaultConfig.code(),
                }],
            }],
        }
    }

    fn connector_info(name: &str) -> ConnectorInfo {
        ConnectorInfo {
            name: name.to_string(),
            config: HashMap::from([("tasks.max".to_string(), "1".to_string())]),
            tasks: vec![ConnectorTaskId {
                connector: name.to_string(),
                task: 0,
            }],
            connector_type: Some("sink".to_string()),
        }
    }

    fn describe(broker_id: i32) -> DescribeBrokerConfigRequest {
        DescribeBrokerConfigRequest {
            broker_id,
            config_keys: None,
        }
    }

    #[tokio::test]
    async fn test_describe_projects_dynamic_override() {
        let mut admin = MockKafkaAdminClient::new();
        admin
            .expect_describe_broker_config()
            .withf(|_, broker_id, keys| {
                *broker_id == 1 && keys.as_deref() == Some(&["log.retention.ms".to_string()][..])
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(DescribeConfigsResponse {
                    resources: vec![retention_resource(SourceKind::DynamicBrokerConfig)],
                })
            });
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let entries = gateway
            .describe_broker_config(
                &RequestContext::background(),
                "prod",
                DescribeBrokerConfigRequest {
                    broker_id: 1,
                    config_keys: Some(vec!["log.retention.ms".to_string()]),
                },
            )
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_default_value);
        assert!(entries[0].is_explicitly_set);
    }

    #[tokio::test]
    async fn test_describe_default_source() {
        let admin = admin_returning(DescribeConfigsResponse {
            resources: vec![retention_resource(SourceKind::DefaultConfig)],
        });
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let entries = gateway
            .describe_broker_config(&RequestContext::background(), "prod", describe(1))
            .await
            .unwrap();

        assert!(entries[0].is_default_value);
        assert!(!entries[0].is_explicitly_set);
    }

    #[tokio::test]
    async fn test_describe_empty_response() {
        let admin = admin_returning(DescribeConfigsResponse::default());
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let err = gateway
            .describe_broker_config(&RequestContext::background(), "prod", describe(1))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::ContractViolation);
        assert_eq!(err.message(), "Broker config response was empty");
        assert_eq!(
            err.cause().to_string(),
            "broker describe config response was empty"
        );
        assert!(!err.is_silent());
    }

    #[tokio::test]
    async fn test_describe_resource_error_code() {
        let mut resource = retention_resource(SourceKind::DefaultConfig);
        resource.error_code = 31;
        let admin = admin_returning(DescribeConfigsResponse {
            resources: vec![resource],
        });
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let err = gateway
            .describe_broker_config(&RequestContext::background(), "prod", describe(1))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Protocol);
        assert_eq!(
            err.message(),
            "Failed to describe broker config resource: CLUSTER_AUTHORIZATION_FAILED: Cluster authorization failed."
        );
        let protocol_err = err.cause().downcast_ref::<KafkaProtocolError>().unwrap();
        assert_eq!(protocol_err.code, 31);
        assert_eq!(err.log_fields().get("error_code").unwrap(), "31");
        assert_eq!(err.log_fields().get("retryable").unwrap(), "false");
    }

    #[tokio::test]
    async fn test_describe_retriable_resource_error() {
        let mut resource = retention_resource(SourceKind::DefaultConfig);
        resource.error_code = 7;
        let admin = admin_returning(DescribeConfigsResponse {
            resources: vec![resource],
        });
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let err = gateway
            .describe_broker_config(&RequestContext::background(), "prod", describe(1))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Protocol);
        assert_eq!(err.log_fields().get("retryable").unwrap(), "true");
    }

    #[tokio::test]
    async fn test_describe_transport_failure() {
        let mut admin = MockKafkaAdminClient::new();
        admin
            .expect_describe_broker_config()
            .returning(|_, _, _| Err(ConsoleError::network("connection refused")));
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let err = gateway
            .describe_broker_config(&RequestContext::background(), "prod", describe(2))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Unavailable);
        assert_eq!(
            err.message(),
            "Failed to request broker's config: network error: connection refused"
        );
        assert_eq!(err.log_fields().get("broker_id").unwrap(), "2");
        assert_eq!(err.log_fields().get("retryable").unwrap(), "true");
    }

    #[tokio::test]
    async fn test_describe_malformed_record() {
        let mut resource = retention_resource(SourceKind::DefaultConfig);
        resource.configs[0].source = 42;
        let admin = admin_returning(DescribeConfigsResponse {
            resources: vec![resource],
        });
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(admin)));

        let err = gateway
            .describe_broker_config(&RequestContext::background(), "prod", describe(1))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::ContractViolation);
        assert!(err
            .message()
            .starts_with("Failed to parse broker config response: "));
    }

    #[tokio::test]
    async fn test_create_connector_remote_rejection() {
        let mut connect = MockConnectClient::new();
        connect
            .expect_create_connector()
            .times(1)
            .returning(|_, _| Err(ConsoleError::remote(409, "name already exists")));
        let gateway = gateway_with(ClusterHandle::new("prod").with_connect(Arc::new(connect)));

        let err = gateway
            .create_connector(
                &RequestContext::background(),
                "prod",
                CreateConnectorRequest {
                    name: "s3-sink".to_string(),
                    config: HashMap::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(err.message().contains("name already exists"));
        assert!(err.message().starts_with("Failed to create Connector: "));
        assert_eq!(err.class(), ErrorClass::RemoteCall);
        assert_ne!(err.class(), ErrorClass::Lookup);
        assert_ne!(err.class(), ErrorClass::ContractViolation);
        assert_eq!(err.log_fields().get("cluster_name").unwrap(), "prod");
    }

    #[tokio::test]
    async fn test_create_connector_returns_payload_unchanged() {
        let mut connect = MockConnectClient::new();
        connect
            .expect_create_connector()
            .withf(|_, request| request.name == "s3-sink")
            .returning(|_, request| Ok(connector_info(&request.name)));
        let gateway = gateway_with(ClusterHandle::new("prod").with_connect(Arc::new(connect)));

        let info = gateway
            .create_connector(
                &RequestContext::background(),
                "prod",
                CreateConnectorRequest {
                    name: "s3-sink".to_string(),
                    config: HashMap::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(info, connector_info("s3-sink"));
    }

    #[tokio::test]
    async fn test_put_connector_config() {
        let mut connect = MockConnectClient::new();
        connect
            .expect_put_connector_config()
            .with(mockall::predicate::always(), eq("s3-sink"), mockall::predicate::always())
            .times(1)
            .returning(|_, name, _| Ok(connector_info(name)));
        let gateway = gateway_with(ClusterHandle::new("prod").with_connect(Arc::new(connect)));

        let info = gateway
            .put_connector_config(
                &RequestContext::background(),
                "prod",
                "s3-sink",
                PutConnectorConfigRequest {
                    config: HashMap::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(info.name, "s3-sink");
    }

    #[tokio::test]
    async fn test_put_connector_config_failure_fields() {
        let mut connect = MockConnectClient::new();
        connect
            .expect_put_connector_config()
            .returning(|_, _, _| Err(ConsoleError::remote(400, "Connector configuration is invalid")));
        let gateway = gateway_with(ClusterHandle::new("prod").with_connect(Arc::new(connect)));

        let err = gateway
            .put_connector_config(
                &RequestContext::background(),
                "prod",
                "s3-sink",
                PutConnectorConfigRequest {
                    config: HashMap::new(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.message(),
            "Failed to patch Connector config: Connector configuration is invalid (HTTP 400)"
        );
        assert_eq!(err.class(), ErrorClass::RemoteCall);
        assert_eq!(err.log_fields().get("cluster_name").unwrap(), "prod");
        assert_eq!(err.log_fields().get("connector_name").unwrap(), "s3-sink");
    }

    #[tokio::test]
    async fn test_quiet_error_is_passed_through() {
        let mut connect = MockConnectClient::new();
        connect
            .expect_create_connector()
            .returning(|_, _| Err(ConsoleError::remote(409, "exists").quiet()));
        let gateway = gateway_with(ClusterHandle::new("prod").with_connect(Arc::new(connect)));

        let err = gateway
            .create_connector(
                &RequestContext::background(),
                "prod",
                CreateConnectorRequest {
                    name: "a".to_string(),
                    config: HashMap::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_silent());
    }

    #[tokio::test]
    async fn test_lookup_error_is_returned_verbatim() {
        let mut registry = MockClusterRegistry::new();
        registry
            .expect_lookup()
            .with(eq("missing"))
            .returning(|_| Err(GatewayError::lookup("custom lookup failure").silent(true)));
        let gateway = ClusterOperationGateway::new(Arc::new(registry));

        let err = gateway
            .describe_broker_config(&RequestContext::background(), "missing", describe(1))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Lookup);
        assert_eq!(err.message(), "custom lookup failure");
        assert!(err.is_silent());
    }

    #[tokio::test]
    async fn test_missing_connect_client_is_lookup_error() {
        let gateway = gateway_with(ClusterHandle::new("prod"));

        let err = gateway
            .create_connector(
                &RequestContext::background(),
                "prod",
                CreateConnectorRequest {
                    name: "a".to_string(),
                    config: HashMap::new(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Lookup);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(SlowAdmin)));

        let err = gateway
            .describe_broker_config(
                &RequestContext::with_timeout(Duration::from_millis(20)),
                "prod",
                describe(1),
            )
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::DeadlineExceeded);
        assert_eq!(
            err.message(),
            "Failed to request broker's config: request deadline exceeded"
        );
    }

    #[tokio::test]
    async fn test_cancelled() {
        let gateway = gateway_with(ClusterHandle::new("prod").with_admin(Arc::new(SlowAdmin)));
        let (ctx, handle) = RequestContext::background().cancellable();

        let task = tokio::spawn(async move {
            gateway
                .describe_broker_config(&ctx, "prod", describe(1))
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.class(), ErrorClass::Cancelled);
    }

    #[test]
    fn test_clusters_delegates_to_registry() {
        let gateway = gateway_with(ClusterHandle::new("prod"));
        let clusters = gateway.clusters();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "prod");
    }

    /// 长时间不返回的管理客户端
    struct SlowAdmin;

    #[async_trait::async_trait]
    impl crate::ports::KafkaAdminClient for SlowAdmin {
        async fn describe_broker_config(
            &self,
            _ctx: &RequestContext,
            _broker_id: i32,
            _config_keys: Option<Vec<String>>,
        ) -> ConsoleResult<DescribeConfigsResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(DescribeConfigsResponse::default())
        }
    }
}
