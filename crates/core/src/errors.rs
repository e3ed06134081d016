use thiserror::Error;

/// 统一错误类型，所有外部客户端（Kafka管理客户端、Connect客户端、集群注册表）均以此报告失败
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cluster '{name}' not found")]
    ClusterNotFound { name: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("{message} (HTTP {status})")]
    Remote { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("timed out: {0}")]
    Timeout(String),

    /// 调用方希望该错误不要以错误级别刷屏
    #[error(transparent)]
    Quiet(Box<ConsoleError>),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn cluster_not_found<S: Into<String>>(name: S) -> Self {
        Self::ClusterNotFound { name: name.into() }
    }
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }
    pub fn remote<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// 标记为静默错误，网关会原样传递该偏好
    pub fn quiet(self) -> Self {
        match self {
            quiet @ Self::Quiet(_) => quiet,
            other => Self::Quiet(Box::new(other)),
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Quiet(_))
    }

    /// 去掉静默包装后的原始错误
    pub fn inner(&self) -> &ConsoleError {
        match self {
            Self::Quiet(inner) => inner.inner(),
            other => other,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.inner(), Self::Network(_) | Self::Timeout(_))
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ConsoleError {
    fn from(err: url::ParseError) -> Self {
        ConsoleError::Configuration(format!("invalid url: {err}"))
    }
}
