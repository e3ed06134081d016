use axum::extract::State;
use kconsole_domain::ClusterSummary;

use crate::{response::ApiResponse, routes::AppState};

/// 已配置的集群及其可用能力
pub async fn list_clusters(State(state): State<AppState>) -> ApiResponse<Vec<ClusterSummary>> {
    ApiResponse::success(state.gateway.clusters())
}
