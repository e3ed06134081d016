use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 配置值的来源层，与 Kafka 协议中的 ConfigSource 一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Unknown,
    DynamicTopicConfig,
    DynamicBrokerConfig,
    DynamicDefaultBrokerConfig,
    StaticBrokerConfig,
    DefaultConfig,
    DynamicBrokerLoggerConfig,
}

impl SourceKind {
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(SourceKind::Unknown),
            1 => Some(SourceKind::DynamicTopicConfig),
            2 => Some(SourceKind::DynamicBrokerConfig),
            3 => Some(SourceKind::DynamicDefaultBrokerConfig),
            4 => Some(SourceKind::StaticBrokerConfig),
            5 => Some(SourceKind::DefaultConfig),
            6 => Some(SourceKind::DynamicBrokerLoggerConfig),
            _ => None,
        }
    }

    pub fn code(&self) -> i8 {
        match self {
            SourceKind::Unknown => 0,
            SourceKind::DynamicTopicConfig => 1,
            SourceKind::DynamicBrokerConfig => 2,
            SourceKind::DynamicDefaultBrokerConfig => 3,
            SourceKind::StaticBrokerConfig => 4,
            SourceKind::DefaultConfig => 5,
            SourceKind::DynamicBrokerLoggerConfig => 6,
        }
    }

    /// 协议名称，例如 `DYNAMIC_BROKER_CONFIG`
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Unknown => "UNKNOWN",
            SourceKind::DynamicTopicConfig => "DYNAMIC_TOPIC_CONFIG",
            SourceKind::DynamicBrokerConfig => "DYNAMIC_BROKER_CONFIG",
            SourceKind::DynamicDefaultBrokerConfig => "DYNAMIC_DEFAULT_BROKER_CONFIG",
            SourceKind::StaticBrokerConfig => "STATIC_BROKER_CONFIG",
            SourceKind::DefaultConfig => "DEFAULT_CONFIG",
            SourceKind::DynamicBrokerLoggerConfig => "DYNAMIC_BROKER_LOGGER_CONFIG",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            SourceKind::Unknown,
            SourceKind::DynamicTopicConfig,
            SourceKind::DynamicBrokerConfig,
            SourceKind::DynamicDefaultBrokerConfig,
            SourceKind::StaticBrokerConfig,
            SourceKind::DefaultConfig,
            SourceKind::DynamicBrokerLoggerConfig,
        ]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 配置值类型，与 Kafka 协议中的 ConfigType 一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Unknown,
    Boolean,
    String,
    Int,
    Short,
    Long,
    Double,
    List,
    Class,
    Password,
}

impl ValueType {
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(ValueType::Unknown),
            1 => Some(ValueType::Boolean),
            2 => Some(ValueType::String),
            3 => Some(ValueType::Int),
            4 => Some(ValueType::Short),
            5 => Some(ValueType::Long),
            6 => Some(ValueType::Double),
            7 => Some(ValueType::List),
            8 => Some(ValueType::Class),
            9 => Some(ValueType::Password),
            _ => None,
        }
    }

    pub fn code(&self) -> i8 {
        match self {
            ValueType::Unknown => 0,
            ValueType::Boolean => 1,
            ValueType::String => 2,
            ValueType::Int => 3,
            ValueType::Short => 4,
            ValueType::Long => 5,
            ValueType::Double => 6,
            ValueType::List => 7,
            ValueType::Class => 8,
            ValueType::Password => 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSynonym {
    pub name: String,
    pub value: Option<String>,
    pub source: SourceKind,
}

/// 面向客户端的单个 broker 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub name: String,
    /// 敏感配置时为 None
    pub value: Option<String>,
    pub source: SourceKind,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// 值是否由运维显式配置（即使恰好等于默认值）
    pub is_explicitly_set: bool,
    pub is_default_value: bool,
    pub is_read_only: bool,
    pub is_sensitive: bool,
    /// Kafka < 2.6.0 不返回文档
    pub documentation: Option<String>,
    pub synonyms: Vec<ConfigSynonym>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerConfigs {
    pub broker_id: i32,
    pub configs: Vec<ConfigEntry>,
}

/// DescribeConfigs 响应中原始的同义配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfigSynonym {
    pub name: String,
    pub value: Option<String>,
    pub source: i8,
}

/// DescribeConfigs 响应中原始的配置记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfigRecord {
    pub name: String,
    pub value: Option<String>,
    pub source: i8,
    pub config_type: i8,
    pub is_default: bool,
    pub read_only: bool,
    pub is_sensitive: bool,
    pub documentation: Option<String>,
    pub synonyms: Vec<RawConfigSynonym>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeConfigsResource {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resource_name: String,
    pub configs: Vec<RawConfigRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeConfigsResponse {
    pub resources: Vec<DescribeConfigsResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DescribeBrokerConfigRequest {
    pub broker_id: i32,
    /// None 表示返回全部配置
    pub config_keys: Option<Vec<String>>,
}

/// Kafka Connect `ConnectorInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorInfo {
    pub name: String,
    pub config: HashMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<ConnectorTaskId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorTaskId {
    pub connector: String,
    pub task: i32,
}

/// Body for `POST /connectors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConnectorRequest {
    pub name: String,
    pub config: HashMap<String, String>,
}

/// Body for `PUT /connectors/{name}/config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutConnectorConfigRequest {
    pub config: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub name: String,
    pub has_kafka_admin: bool,
    pub has_connect: bool,
}
