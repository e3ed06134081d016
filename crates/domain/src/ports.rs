//! 网关依赖的外部协作者
//!
//! Kafka 协议与 Connect REST 协议都不在本 crate 内实现，
//! 由基础设施层提供适配器。

use std::sync::Arc;

use async_trait::async_trait;
use kconsole_core::ConsoleResult;

use crate::context::RequestContext;
use crate::entities::{
    ClusterSummary, ConnectorInfo, CreateConnectorRequest, DescribeConfigsResponse,
    PutConnectorConfigRequest,
};
use crate::errors::GatewayError;

/// Kafka 管理客户端
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KafkaAdminClient: Send + Sync {
    /// 单个 broker 的 DescribeConfigs，`config_keys` 为 None 时返回全部配置
    async fn describe_broker_config(
        &self,
        ctx: &RequestContext,
        broker_id: i32,
        config_keys: Option<Vec<String>>,
    ) -> ConsoleResult<DescribeConfigsResponse>;
}

/// Kafka Connect 客户端
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectClient: Send + Sync {
    async fn create_connector(
        &self,
        ctx: &RequestContext,
        request: CreateConnectorRequest,
    ) -> ConsoleResult<ConnectorInfo>;

    async fn put_connector_config(
        &self,
        ctx: &RequestContext,
        connector_name: &str,
        request: PutConnectorConfigRequest,
    ) -> ConsoleResult<ConnectorInfo>;
}

/// 逻辑集群名到客户端句柄的只读注册表
#[cfg_attr(test, mockall::automock)]
pub trait ClusterRegistry: Send + Sync {
    /// 失败时返回的错误已经归一化，网关原样透传
    fn lookup(&self, cluster_name: &str) -> Result<ClusterHandle, GatewayError>;

    fn clusters(&self) -> Vec<ClusterSummary>;
}

/// 已连接集群的客户端句柄，可在并发请求间共享
#[derive(Clone)]
pub struct ClusterHandle {
    name: String,
    admin: Option<Arc<dyn KafkaAdminClient>>,
    connect: Option<Arc<dyn ConnectClient>>,
}

impl ClusterHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            admin: None,
            connect: None,
        }
    }

    pub fn with_admin(mut self, admin: Arc<dyn KafkaAdminClient>) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn with_connect(mut self, connect: Arc<dyn ConnectClient>) -> Self {
        self.connect = Some(connect);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> ClusterSummary {
        ClusterSummary {
            name: self.name.clone(),
            has_kafka_admin: self.admin.is_some(),
            has_connect: self.connect.is_some(),
        }
    }

    pub fn admin_client(&self) -> Result<Arc<dyn KafkaAdminClient>, GatewayError> {
        self.admin.clone().ok_or_else(|| {
            GatewayError::lookup(format!(
                "Cluster '{}' has no Kafka admin client configured",
                self.name
            ))
            .with_field("cluster_name", &self.name)
        })
    }

    pub fn connect_client(&self) -> Result<Arc<dyn ConnectClient>, GatewayError> {
        self.connect.clone().ok_or_else(|| {
            GatewayError::lookup(format!(
                "Cluster '{}' has no Kafka Connect client configured",
                self.name
            ))
            .with_field("cluster_name", &self.name)
        })
    }
}

impl std::fmt::Debug for ClusterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterHandle")
            .field("name", &self.name)
            .field("admin", &self.admin.is_some())
            .field("connect", &self.connect.is_some())
            .finish()
    }
}
