//! KConsole 后端：Kafka 集群管理 REST 服务
//!
//! 二进制入口见 `main.rs`，这里导出应用装配与优雅关闭，便于集成测试复用。

pub mod app;
pub mod shutdown;

pub use app::Application;
pub use shutdown::{wait_for_shutdown_signal, ShutdownManager};
