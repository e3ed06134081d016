//! 配置管理
//!
//! 配置按以下优先级合并（后者覆盖前者）：
//!
//! 1. 内置默认值
//! 2. TOML 配置文件（显式路径，或依次查找 `config/kconsole.toml`、`kconsole.toml`、
//!    `/etc/kconsole/config.toml`）
//! 3. `KCONSOLE_` 前缀的环境变量，嵌套键以 `__` 分隔，例如
//!    `KCONSOLE_SERVER__BIND_ADDRESS=127.0.0.1:9000`
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0:8080"
//!
//! [[clusters]]
//! name = "prod"
//!
//! [clusters.kafka]
//! rest_proxy_url = "http://rest-proxy:8082"
//! cluster_id = "lkc-abc123"
//!
//! [clusters.connect]
//! url = "http://connect:8083"
//! ```

pub mod models;

pub use models::{
    AppConfig, ClusterConfig, ConnectClusterConfig, KafkaAdminConfig, ObservabilityConfig,
    ServerConfig,
};
