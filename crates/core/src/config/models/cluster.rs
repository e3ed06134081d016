use serde::{Deserialize, Serialize};
use url::Url;

fn default_cluster_timeout_seconds() -> u64 {
    15
}

/// 一个逻辑集群：名称 + 可选的Kafka管理端点 + 可选的Kafka Connect端点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    #[serde(default)]
    pub kafka: Option<KafkaAdminConfig>,
    #[serde(default)]
    pub connect: Option<ConnectClusterConfig>,
    /// HTTP客户端超时
    #[serde(default = "default_cluster_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

/// 通过 Kafka REST Proxy v3 访问 broker 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaAdminConfig {
    pub rest_proxy_url: String,
    pub cluster_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectClusterConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ClusterConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow::anyhow!("集群名称不能为空"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "集群 {} 的请求超时时间必须大于0",
                self.name
            ));
        }

        if self.kafka.is_none() && self.connect.is_none() {
            return Err(anyhow::anyhow!(
                "集群 {} 至少需要配置 kafka 或 connect 之一",
                self.name
            ));
        }

        if let Some(kafka) = &self.kafka {
            kafka.validate()?;
        }
        if let Some(connect) = &self.connect {
            connect.validate()?;
        }

        Ok(())
    }
}

impl KafkaAdminConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_http_url(&self.rest_proxy_url)?;
        if self.cluster_id.trim().is_empty() {
            return Err(anyhow::anyhow!("Kafka cluster_id 不能为空"));
        }
        validate_basic_auth(&self.username, &self.password)
    }
}

impl ConnectClusterConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_http_url(&self.url)?;
        validate_basic_auth(&self.username, &self.password)?;
        if self.token.is_some() && self.username.is_some() {
            return Err(anyhow::anyhow!("Connect认证只能选择 basic 或 token 之一"));
        }
        Ok(())
    }
}

fn validate_http_url(raw: &str) -> anyhow::Result<()> {
    let url = Url::parse(raw).map_err(|e| anyhow::anyhow!("URL无效 {raw}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow::anyhow!("URL协议必须为http或https，实际为: {other}")),
    }
}

fn validate_basic_auth(username: &Option<String>, password: &Option<String>) -> anyhow::Result<()> {
    match (username, password) {
        (Some(_), None) | (None, Some(_)) => {
            Err(anyhow::anyhow!("basic认证需要同时配置 username 和 password"))
        }
        _ => Ok(()),
    }
}
