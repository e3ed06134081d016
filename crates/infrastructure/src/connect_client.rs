use std::time::Duration;

use async_trait::async_trait;
use kconsole_core::{ConnectClusterConfig, ConsoleResult};
use kconsole_domain::{
    ConnectClient, ConnectorInfo, CreateConnectorRequest, PutConnectorConfigRequest,
    RequestContext,
};
use reqwest::Method;
use tracing::{debug, info};

use crate::http::{quiet_on_status, HttpAuth, JsonHttpClient};

/// 同名 Connector 已存在
const CONFLICT: u16 = 409;

/// Kafka Connect REST 客户端
#[derive(Debug, Clone)]
pub struct ConnectHttpClient {
    http: JsonHttpClient,
}

impl ConnectHttpClient {
    pub fn new(config: &ConnectClusterConfig, timeout: Duration) -> ConsoleResult<Self> {
        let auth = HttpAuth::from_parts(
            config.username.as_deref(),
            config.password.as_deref(),
            config.token.as_deref(),
        )?;

        Ok(Self {
            http: JsonHttpClient::new(&config.url, auth, timeout)?,
        })
    }
}

#[async_trait]
impl ConnectClient for ConnectHttpClient {
    async fn create_connector(
        &self,
        ctx: &RequestContext,
        request: CreateConnectorRequest,
    ) -> ConsoleResult<ConnectorInfo> {
        let url = self.http.endpoint(&["connectors"])?;
        debug!(%url, connector_name = %request.name, "Creating connector");

        let info: ConnectorInfo = self
            .http
            .send(self.http.request(ctx, Method::POST, url).json(&request))
            .await
            .map_err(|err| quiet_on_status(err, &[CONFLICT]))?;

        info!(connector_name = %info.name, "Connector created");
        Ok(info)
    }

    async fn put_connector_config(
        &self,
        ctx: &RequestContext,
        connector_name: &str,
        request: PutConnectorConfigRequest,
    ) -> ConsoleResult<ConnectorInfo> {
        let url = self
            .http
            .endpoint(&["connectors", connector_name, "config"])?;
        debug!(%url, connector_name, "Updating connector config");

        // Connect 的 PUT 请求体就是配置 map 本身
        let info: ConnectorInfo = self
            .http
            .send(
                self.http
                    .request(ctx, Method::PUT, url)
                    .json(&request.config),
            )
            .await?;

        info!(connector_name, "Connector config updated");
        Ok(info)
    }
}
