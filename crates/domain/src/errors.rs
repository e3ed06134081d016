use std::collections::BTreeMap;
use std::fmt;

/// 网关错误分类，与具体传输层状态码无关，HTTP 映射在 API 边界完成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// 集群不存在，或集群未配置所需客户端
    Lookup,
    /// 远端服务处理请求后拒绝
    RemoteCall,
    /// 无法连接 broker / 集群
    Unavailable,
    /// 远端应答成功但资源级别携带协议错误码
    Protocol,
    /// 远端响应结构违反约定
    ContractViolation,
    Cancelled,
    DeadlineExceeded,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Lookup => "LOOKUP_ERROR",
            ErrorClass::RemoteCall => "REMOTE_CALL_ERROR",
            ErrorClass::Unavailable => "SERVICE_UNAVAILABLE",
            ErrorClass::Protocol => "PROTOCOL_ERROR",
            ErrorClass::ContractViolation => "CONTRACT_VIOLATION",
            ErrorClass::Cancelled => "CANCELLED",
            ErrorClass::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 网关返回给 HTTP 层的统一错误
///
/// `message` 面向用户，`cause` 保留底层错误链，`log_fields` 只用于服务端日志。
#[derive(Debug)]
pub struct GatewayError {
    cause: anyhow::Error,
    class: ErrorClass,
    message: String,
    log_fields: BTreeMap<String, String>,
    silent: bool,
}

pub type OperationResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn new<E, S>(cause: E, class: ErrorClass, message: S) -> Self
    where
        E: Into<anyhow::Error>,
        S: Into<String>,
    {
        Self {
            cause: cause.into(),
            class,
            message: message.into(),
            log_fields: BTreeMap::new(),
            silent: false,
        }
    }

    pub fn lookup<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        Self::new(anyhow::anyhow!(message.clone()), ErrorClass::Lookup, message)
    }

    pub fn with_field<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.log_fields.insert(key.into(), value.to_string());
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn log_fields(&self) -> &BTreeMap<String, String> {
        &self.log_fields
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + 'static) = self.cause.as_ref();
        Some(cause)
    }
}
