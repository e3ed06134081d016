use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use kconsole_domain::{ClusterOperationGateway, RequestContext};

use crate::handlers::{
    brokers::get_broker_config,
    clusters::list_clusters,
    connect::{create_connector, put_connector_config},
    health::health_check,
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ClusterOperationGateway>,
    /// 单个请求转发到远端集群的截止时间
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(gateway: Arc<ClusterOperationGateway>, request_timeout: Duration) -> Self {
        Self {
            gateway,
            request_timeout,
        }
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 集群
        .route("/api/clusters", get(list_clusters))
        .route(
            "/api/clusters/{cluster_name}/brokers/{broker_id}/config",
            get(get_broker_config),
        )
        // Kafka Connect
        .route(
            "/api/kafka-connect/clusters/{cluster_name}/connectors",
            post(create_connector),
        )
        .route(
            "/api/kafka-connect/clusters/{cluster_name}/connectors/{connector}",
            put(put_connector_config),
        )
        .with_state(state)
}
