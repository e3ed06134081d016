use std::time::Duration;

use kconsole_core::{ConsoleError, ConsoleResult};
use kconsole_domain::RequestContext;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// 出站 HTTP 请求的认证方式
#[derive(Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    Basic { username: String, password: String },
    Bearer(String),
}

impl std::fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpAuth::None => f.write_str("None"),
            HttpAuth::Basic { username, .. } => write!(f, "Basic({username}, ***)"),
            HttpAuth::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}

impl HttpAuth {
    pub fn from_parts(
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> ConsoleResult<Self> {
        match (username, password, token) {
            (None, None, None) => Ok(HttpAuth::None),
            (None, None, Some(token)) => Ok(HttpAuth::Bearer(token.to_string())),
            (Some(username), Some(password), None) => Ok(HttpAuth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            (_, _, Some(_)) => Err(ConsoleError::config_error(
                "basic auth and bearer token are mutually exclusive",
            )),
            _ => Err(ConsoleError::config_error(
                "basic auth requires both username and password",
            )),
        }
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            HttpAuth::None => builder,
            HttpAuth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            HttpAuth::Bearer(token) => builder.bearer_auth(token),
        }
    }
}

/// Connect 与 REST Proxy 共用的错误响应体
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    error_code: Option<i64>,
    message: String,
}

/// 基于 reqwest 的 JSON 客户端，所有出站调用都经过这里
#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    base_url: Url,
    http_client: Client,
    auth: HttpAuth,
    /// 集群级超时，请求截止时间更早时以截止时间为准
    timeout: Duration,
}

impl JsonHttpClient {
    pub fn new(base_url: &str, auth: HttpAuth, timeout: Duration) -> ConsoleResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::config_error(format!(
                "url cannot be used as a base: {base_url}"
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::config_error(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http_client,
            auth,
            timeout,
        })
    }

    /// 在基础地址后追加路径段，每段单独做百分号编码
    pub fn endpoint(&self, segments: &[&str]) -> ConsoleResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConsoleError::config_error(format!("url cannot be used as a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 请求级超时会覆盖客户端超时，所以这里取两者中较小的一个
    pub fn request(&self, ctx: &RequestContext, method: reqwest::Method, url: Url) -> RequestBuilder {
        let timeout = self.effective_timeout(ctx);
        let builder = self.http_client.request(method, url).timeout(timeout);
        self.auth.apply(builder)
    }

    fn effective_timeout(&self, ctx: &RequestContext) -> Duration {
        ctx.remaining()
            .map_or(self.timeout, |remaining| remaining.min(self.timeout))
    }

    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ConsoleResult<T> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let err = remote_error(response).await;
            warn!(%url, status = status.as_u16(), error = %err, "Remote request rejected");
            return Err(err);
        }

        debug!(%url, status = status.as_u16(), "Remote request succeeded");
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ConsoleError::Serialization(format!("invalid response body from {url}: {e}"))
            } else {
                map_transport_error(e)
            }
        })
    }
}

/// 远端按预期拒绝的请求（例如资源已存在/不存在）标记为静默，避免以错误级别刷日志
pub fn quiet_on_status(err: ConsoleError, statuses: &[u16]) -> ConsoleError {
    match err {
        ConsoleError::Remote { status, .. } if statuses.contains(&status) => err.quiet(),
        other => other,
    }
}

fn map_transport_error(err: reqwest::Error) -> ConsoleError {
    if err.is_timeout() {
        ConsoleError::Timeout(err.to_string())
    } else {
        ConsoleError::network(err.to_string())
    }
}

async fn remote_error(response: Response) -> ConsoleError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<RemoteErrorBody>(&body) {
        Ok(parsed) => {
            if let Some(code) = parsed.error_code {
                debug!(error_code = code, "Remote error body");
            }
            parsed.message
        }
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };

    ConsoleError::remote(status.as_u16(), message)
}
