//! # KConsole API
//!
//! Kafka集群管理后端的REST API服务模块。
//!
//! ## 概述
//!
//! 此模块基于Axum框架构建，把HTTP请求转交给领域层的
//! [`ClusterOperationGateway`]，并把网关错误映射为统一的错误响应。
//!
//! ## API 端点
//!
//! ### 集群
//! - `GET /api/clusters` - 已配置的集群及其能力
//! - `GET /api/clusters/{clusterName}/brokers/{brokerId}/config?keys=a,b` - broker 配置
//!
//! ### Kafka Connect
//! - `POST /api/kafka-connect/clusters/{clusterName}/connectors` - 创建 Connector
//! - `PUT /api/kafka-connect/clusters/{clusterName}/connectors/{connector}` - 更新 Connector 配置
//!
//! ### 健康检查
//! - `GET /health`
//!
//! ## 响应格式
//!
//! 成功：`{"success": true, "data": ..., "message": null, "timestamp": "..."}`
//!
//! 失败：`{"error": {"message": "...", "type": "LOOKUP_ERROR", "code": 404, "suggestions": [], "timestamp": "..."}}`

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use kconsole_core::ServerConfig;
use kconsole_domain::ClusterOperationGateway;
use tower::ServiceBuilder;

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(gateway: Arc<ClusterOperationGateway>, server_config: &ServerConfig) -> Router {
    let state = AppState::new(
        gateway,
        Duration::from_secs(server_config.request_timeout_seconds),
    );

    let router = create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    );

    if server_config.cors_enabled {
        router.layer(cors_layer())
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use kconsole_domain::StaticClusterRegistry;
    use tower::ServiceExt;

    fn empty_app() -> Router {
        let gateway = Arc::new(ClusterOperationGateway::new(Arc::new(
            StaticClusterRegistry::new(),
        )));
        create_app(gateway, &ServerConfig::default())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = empty_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = empty_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_unknown_cluster_is_not_found() {
        let response = empty_app()
            .oneshot(
                Request::builder()
                    .uri("/api/clusters/missing/brokers/1/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
