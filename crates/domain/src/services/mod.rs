//! # 领域服务模块
//!
//! 集群管理后端的核心业务逻辑，均为无状态服务。
//!
//! ## 服务分类
//!
//! ### 配置来源解析
//! - 根据同义配置判断配置值是否被显式设置、是否等于默认值
//! - 纯函数，不做任何 I/O
//!
//! ### 配置项投影
//! - 将 DescribeConfigs 的原始记录转换为面向客户端的 [`ConfigEntry`](crate::entities::ConfigEntry)
//! - 任一记录非法时整体失败
//!
//! ### 集群操作网关
//! - 根据集群名查找客户端句柄
//! - 执行 describe-broker-config、create-connector、put-connector-config
//! - 将失败归一化为 [`GatewayError`](crate::errors::GatewayError)
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kconsole_domain::{ClusterOperationGateway, RequestContext, StaticClusterRegistry};
//!
//! let gateway = ClusterOperationGateway::new(Arc::new(StaticClusterRegistry::new()));
//! let ctx = RequestContext::with_timeout(std::time::Duration::from_secs(15));
//! let configs = gateway
//!     .describe_broker_config(&ctx, "prod", DescribeBrokerConfigRequest { broker_id: 1, config_keys: None })
//!     .await?;
//! ```

pub mod cluster_gateway;
pub mod config_projector;
pub mod config_resolver;

pub use cluster_gateway::ClusterOperationGateway;
pub use config_projector::{project, ProjectionError};
pub use config_resolver::{resolve, ConfigResolution};
