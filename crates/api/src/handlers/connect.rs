use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::Json;
use kconsole_domain::{ConnectorInfo, CreateConnectorRequest, PutConnectorConfigRequest};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    response::ApiResponse,
    routes::AppState,
};

pub async fn create_connector(
    State(state): State<AppState>,
    cluster_name: Result<Path<String>, PathRejection>,
    request: Result<Json<CreateConnectorRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<ConnectorInfo>> {
    let Path(cluster_name) = cluster_name?;
    let Json(request) = request?;
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("connector name 不能为空".to_string()));
    }

    info!(cluster_name = %cluster_name, connector_name = %request.name, "创建Connector");
    let ctx = state.request_context();
    let connector = state
        .gateway
        .create_connector(&ctx, &cluster_name, request)
        .await?;

    Ok(ApiResponse::success_with_message(
        connector,
        "Connector created".to_string(),
    ))
}

pub async fn put_connector_config(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    request: Result<Json<PutConnectorConfigRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<ConnectorInfo>> {
    let Path((cluster_name, connector)) = path?;
    let Json(request) = request?;
    info!(cluster_name = %cluster_name, connector_name = %connector, "更新Connector配置");
    let ctx = state.request_context();
    let connector = state
        .gateway
        .put_connector_config(&ctx, &cluster_name, &connector, request)
        .await?;

    Ok(ApiResponse::success(connector))
}
