use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kconsole_domain::{ErrorClass, GatewayError};
use serde_json::json;
use tracing::{debug, error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("请求参数错误: {0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

// 提取器拒绝也走统一的错误响应格式
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// 错误分类到 HTTP 状态码的映射，只在 API 边界使用
pub fn status_for_class(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Lookup => StatusCode::NOT_FOUND,
        // 远端拒绝请求并不代表本服务不可用
        ErrorClass::RemoteCall => StatusCode::OK,
        ErrorClass::Unavailable | ErrorClass::Protocol | ErrorClass::Cancelled => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorClass::ContractViolation => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorClass::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn suggestions_for_class(class: ErrorClass) -> Vec<&'static str> {
    match class {
        ErrorClass::Lookup => vec![
            "请检查集群名称是否正确",
            "使用 GET /api/clusters 查看已配置的集群",
        ],
        ErrorClass::Unavailable | ErrorClass::Cancelled => {
            vec!["请检查集群是否可达", "稍后重试"]
        }
        ErrorClass::DeadlineExceeded => vec!["稍后重试", "或增大 server.request_timeout_seconds"],
        ErrorClass::RemoteCall | ErrorClass::Protocol | ErrorClass::ContractViolation => vec![],
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Gateway(err) => status_for_class(err.class()),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, error_type, suggestions) = match &self {
            ApiError::Gateway(err) => {
                let cause = format!("{:#}", err.cause());
                if err.is_silent() {
                    debug!(
                        status = status.as_u16(),
                        class = %err.class(),
                        fields = ?err.log_fields(),
                        cause = %cause,
                        "{}",
                        err.message()
                    );
                } else {
                    error!(
                        status = status.as_u16(),
                        class = %err.class(),
                        fields = ?err.log_fields(),
                        cause = %cause,
                        "{}",
                        err.message()
                    );
                }
                (
                    err.message().to_string(),
                    err.class().as_str(),
                    suggestions_for_class(err.class()),
                )
            }
            ApiError::BadRequest(msg) => {
                warn!(status = status.as_u16(), "请求参数错误: {}", msg);
                (
                    msg.clone(),
                    "BAD_REQUEST",
                    vec!["请检查请求参数格式是否正确"],
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "suggestions": suggestions,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_status_mapping() {
        assert_eq!(status_for_class(ErrorClass::Lookup), StatusCode::NOT_FOUND);
        assert_eq!(status_for_class(ErrorClass::RemoteCall), StatusCode::OK);
        assert_eq!(
            status_for_class(ErrorClass::Unavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for_class(ErrorClass::Protocol),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for_class(ErrorClass::ContractViolation),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for_class(ErrorClass::Cancelled),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for_class(ErrorClass::DeadlineExceeded),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_bad_request_status() {
        let err = ApiError::BadRequest("connector name is required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "请求参数错误: connector name is required");
    }

    #[test]
    fn test_gateway_error_is_transparent() {
        let err = ApiError::from(GatewayError::lookup("Could not find cluster: x"));
        assert_eq!(err.to_string(), "Could not find cluster: x");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
