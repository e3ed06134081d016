pub mod cluster_registry;
pub mod connect_client;
pub mod http;
pub mod observability;
pub mod rest_proxy_admin;

pub use cluster_registry::{cluster_handle, registry_from_config};
pub use connect_client::ConnectHttpClient;
pub use http::{HttpAuth, JsonHttpClient};
pub use observability::{init_logging, init_metrics, LogFormat};
pub use rest_proxy_admin::RestProxyAdminClient;
