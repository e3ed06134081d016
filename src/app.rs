use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use kconsole_api::create_app;
use kconsole_core::AppConfig;
use kconsole_domain::ClusterOperationGateway;
use kconsole_infrastructure::registry_from_config;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

/// 主应用程序
pub struct Application {
    config: AppConfig,
    router: Router,
}

impl Application {
    /// 根据配置创建集群注册表、网关与路由
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = registry_from_config(&config).context("创建集群客户端失败")?;
        info!("已加载 {} 个集群", registry.len());

        let gateway = Arc::new(ClusterOperationGateway::new(Arc::new(registry)));
        let router = create_app(gateway, &config.server);

        Ok(Self { config, router })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 绑定配置中的地址并运行，直到收到关闭信号
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = &self.config.server.bind_address;
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;

        self.serve(listener, shutdown_rx).await
    }

    /// 在已绑定的监听器上运行API服务器
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let local_addr = listener.local_addr().context("获取监听地址失败")?;
        info!("API服务器启动在 http://{local_addr}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        info!("API服务器已停止");
        Ok(())
    }
}
