use std::error::Error as _;
use std::time::Duration;

use inno_config::DEFAULT_PROBE_TIMEOUT;
use inno_errors::{InnoError, InnoResult};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// 对模型服务根路径发起单次 GET 探测
///
/// 只有 HTTP 200 视为成功。其他状态码与传输层失败（DNS、拒绝连接、超时）
/// 都归入同一类连接错误，调用方只能通过错误信息区分。
#[derive(Debug, Clone)]
pub struct EndpointProbe {
    timeout: Duration,
}

impl EndpointProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 阻塞当前线程直到收到响应或超时。
    ///
    /// 不能在 tokio 运行时的异步上下文中直接调用，异步调用方应使用 [`EndpointProbe::probe_async`]。
    pub fn probe(&self, url: &str) -> InnoResult<String> {
        debug!("Probing {} (timeout {:?})", url, self.timeout);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| transport_error(url, &e))?;

        match client.get(url).send() {
            Ok(response) => check_status(url, response.status()),
            Err(e) => Err(transport_error(url, &e)),
        }
    }

    pub async fn probe_async(&self, url: &str) -> InnoResult<String> {
        debug!("Probing {} asynchronously (timeout {:?})", url, self.timeout);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| transport_error(url, &e))?;

        match client.get(url).send().await {
            Ok(response) => check_status(url, response.status()),
            Err(e) => Err(transport_error(url, &e)),
        }
    }
}

impl Default for EndpointProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

/// 使用默认 5 秒超时的阻塞探测
pub fn probe_endpoint(url: &str) -> InnoResult<String> {
    EndpointProbe::default().probe(url)
}

pub async fn probe_endpoint_async(url: &str) -> InnoResult<String> {
    EndpointProbe::default().probe_async(url).await
}

fn check_status(url: &str, status: StatusCode) -> InnoResult<String> {
    if status == StatusCode::OK {
        info!("Connection to {} successful!", url);
        Ok(url.to_string())
    } else {
        warn!("Model server at {} answered HTTP {}", url, status.as_u16());
        Err(InnoError::unexpected_status(url, status.as_u16()))
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> InnoError {
    warn!("Connection failed to {}: {}", url, err);
    InnoError::transport(url, describe(err))
}

// reqwest 的顶层信息只有 "error sending request"，真正原因在 source 链上
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
