use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use kconsole_domain::{BrokerConfigs, DescribeBrokerConfigRequest};
use serde::Deserialize;
use tracing::debug;

use crate::{error::ApiResult, response::ApiResponse, routes::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct BrokerConfigQuery {
    /// 逗号分隔的配置名，缺省时返回全部配置
    pub keys: Option<String>,
}

impl BrokerConfigQuery {
    pub fn config_keys(&self) -> Option<Vec<String>> {
        let keys: Vec<String> = self
            .keys
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();

        if keys.is_empty() {
            None
        } else {
            Some(keys)
        }
    }
}

pub async fn get_broker_config(
    State(state): State<AppState>,
    path: Result<Path<(String, i32)>, PathRejection>,
    query: Result<Query<BrokerConfigQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<BrokerConfigs>> {
    let Path((cluster_name, broker_id)) = path?;
    let Query(query) = query?;
    let request = DescribeBrokerConfigRequest {
        broker_id,
        config_keys: query.config_keys(),
    };
    debug!(cluster_name = %cluster_name, broker_id, keys = ?request.config_keys, "获取broker配置");

    let ctx = state.request_context();
    let configs = state
        .gateway
        .describe_broker_config(&ctx, &cluster_name, request)
        .await?;

    Ok(ApiResponse::success(BrokerConfigs {
        broker_id,
        configs,
    }))
}
