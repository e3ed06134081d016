//! 通过 Kafka REST Proxy v3 获取 broker 配置
//!
//! `GET /v3/clusters/{cluster_id}/brokers/{broker_id}/configs` 返回的 JSON
//! 被转换为与 DescribeConfigs 响应相同的原始记录，交给领域层统一投影。
//! REST Proxy 不返回配置类型与文档，类型统一记为 `UNKNOWN`。

use std::time::Duration;

use async_trait::async_trait;
use kconsole_core::{ConsoleResult, KafkaAdminConfig};
use kconsole_domain::{
    DescribeConfigsResource, DescribeConfigsResponse, KafkaAdminClient, RawConfigRecord,
    RawConfigSynonym, RequestContext, SourceKind, ValueType,
};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::http::{quiet_on_status, HttpAuth, JsonHttpClient};

/// 无法识别的来源名称，投影时会被判定为非法记录
const UNRECOGNISED_SOURCE: i8 = -1;

/// broker 不存在
const NOT_FOUND: u16 = 404;

#[derive(Debug, Deserialize)]
struct BrokerConfigList {
    data: Vec<BrokerConfigData>,
}

#[derive(Debug, Deserialize)]
struct BrokerConfigData {
    name: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    is_read_only: bool,
    #[serde(default)]
    is_sensitive: bool,
    source: String,
    #[serde(default)]
    synonyms: Vec<ConfigSynonymData>,
}

#[derive(Debug, Deserialize)]
struct ConfigSynonymData {
    name: String,
    #[serde(default)]
    value: Option<String>,
    source: String,
}

fn source_code(name: &str) -> i8 {
    SourceKind::from_name(name)
        .map(|kind| kind.code())
        .unwrap_or(UNRECOGNISED_SOURCE)
}

impl From<BrokerConfigData> for RawConfigRecord {
    fn from(data: BrokerConfigData) -> Self {
        RawConfigRecord {
            source: source_code(&data.source),
            config_type: ValueType::Unknown.code(),
            name: data.name,
            value: data.value,
            is_default: data.is_default,
            read_only: data.is_read_only,
            is_sensitive: data.is_sensitive,
            documentation: None,
            synonyms: data
                .synonyms
                .into_iter()
                .map(|synonym| RawConfigSynonym {
                    source: source_code(&synonym.source),
                    name: synonym.name,
                    value: synonym.value,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestProxyAdminClient {
    http: JsonHttpClient,
    cluster_id: String,
}

impl RestProxyAdminClient {
    pub fn new(config: &KafkaAdminConfig, timeout: Duration) -> ConsoleResult<Self> {
        let auth = HttpAuth::from_parts(
            config.username.as_deref(),
            config.password.as_deref(),
            None,
        )?;

        Ok(Self {
            http: JsonHttpClient::new(&config.rest_proxy_url, auth, timeout)?,
            cluster_id: config.cluster_id.clone(),
        })
    }
}

#[async_trait]
impl KafkaAdminClient for RestProxyAdminClient {
    async fn describe_broker_config(
        &self,
        ctx: &RequestContext,
        broker_id: i32,
        config_keys: Option<Vec<String>>,
    ) -> ConsoleResult<DescribeConfigsResponse> {
        let broker = broker_id.to_string();
        let url = self.http.endpoint(&[
            "v3",
            "clusters",
            self.cluster_id.as_str(),
            "brokers",
            broker.as_str(),
            "configs",
        ])?;

        let list: BrokerConfigList = self
            .http
            .send(self.http.request(ctx, Method::GET, url))
            .await
            .map_err(|err| quiet_on_status(err, &[NOT_FOUND]))?;

        let configs: Vec<RawConfigRecord> = list
            .data
            .into_iter()
            .filter(|data| {
                config_keys
                    .as_ref()
                    .map_or(true, |keys| keys.iter().any(|key| key == &data.name))
            })
            .map(RawConfigRecord::from)
            .collect();

        debug!(
            cluster_id = %self.cluster_id,
            broker_id,
            config_count = configs.len(),
            "Fetched broker configs from REST Proxy"
        );

        Ok(DescribeConfigsResponse {
            resources: vec![DescribeConfigsResource {
                error_code: 0,
                error_message: None,
                resource_name: broker,
                configs,
            }],
        })
    }
}
