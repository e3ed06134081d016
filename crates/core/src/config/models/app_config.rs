use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use super::{
    cluster::ClusterConfig,
    server_observability::{ObservabilityConfig, ServerConfig},
};

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,
}

impl AppConfig {
    /// Load configuration from config file and environment variables
    ///
    /// Load order:
    /// 1. Default configuration
    /// 2. Config file (TOML format)
    /// 3. Environment variable overrides (prefix: KCONSOLE_, nested keys joined by `__`)
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("server.cors_enabled", defaults.server.cors_enabled)?
            .set_default(
                "server.request_timeout_seconds",
                defaults.server.request_timeout_seconds,
            )?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default("observability.log_format", defaults.observability.log_format)?
            .set_default(
                "observability.metrics_enabled",
                defaults.observability.metrics_enabled,
            )?
            .set_default(
                "observability.metrics_bind_address",
                defaults.observability.metrics_bind_address,
            )?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else {
            let default_paths = [
                "config/kconsole.toml",
                "kconsole.toml",
                "/etc/kconsole/config.toml",
            ];

            if let Some(path) = default_paths.iter().find(|p| Path::new(p).exists()) {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            }
        }

        // Environment variable overrides - highest priority
        builder = builder.add_source(
            Environment::with_prefix("KCONSOLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterConfig> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate().context("服务配置验证失败")?;

        self.observability
            .validate()
            .context("可观测性配置验证失败")?;

        let mut seen = HashSet::new();
        for cluster in &self.clusters {
            cluster
                .validate()
                .with_context(|| format!("集群配置验证失败: {}", cluster.name))?;
            if !seen.insert(cluster.name.as_str()) {
                return Err(anyhow::anyhow!("集群名称重复: {}", cluster.name));
            }
        }

        Ok(())
    }
}
