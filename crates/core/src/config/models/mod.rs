pub mod app_config;
pub mod cluster;
pub mod server_observability;

// Re-export main types for easier imports
pub use app_config::AppConfig;
pub use cluster::{ClusterConfig, ConnectClusterConfig, KafkaAdminConfig};
pub use server_observability::{ObservabilityConfig, ServerConfig};
