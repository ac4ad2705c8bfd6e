use std::path::PathBuf;

use thiserror::Error;

/// 模型服务探测失败的具体原因
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Error: Received status code {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("Connection failed to {url}: {message}")]
    Transport { url: String, message: String },
}

impl ProbeError {
    pub fn url(&self) -> &str {
        match self {
            ProbeError::UnexpectedStatus { url, .. } | ProbeError::Transport { url, .. } => url,
        }
    }
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeError::UnexpectedStatus { status, .. } => Some(*status),
            ProbeError::Transport { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum InnoError {
    #[error("Models folder not found.")]
    NotFound { path: PathBuf },
    #[error("Connect to model server failed: {0}")]
    Connection(#[from] ProbeError),
    #[error("后台执行器已关闭，拒绝提交新任务")]
    DispatcherClosed,
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type InnoResult<T> = Result<T, InnoError>;

impl InnoError {
    pub fn not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotFound { path: path.into() }
    }
    pub fn unexpected_status<S: Into<String>>(url: S, status: u16) -> Self {
        Self::Connection(ProbeError::UnexpectedStatus {
            url: url.into(),
            status,
        })
    }
    pub fn transport<S: Into<String>, M: Into<String>>(url: S, message: M) -> Self {
        Self::Connection(ProbeError::Transport {
            url: url.into(),
            message: message.into(),
        })
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
    /// 启动流程遇到这些错误时无法继续（模型目录缺失、服务不可达、配置非法）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InnoError::NotFound { .. }
                | InnoError::Connection(_)
                | InnoError::Configuration(_)
                | InnoError::Internal(_)
        )
    }
    pub fn is_connection_error(&self) -> bool {
        matches!(self, InnoError::Connection(_))
    }
    pub fn probe_error(&self) -> Option<&ProbeError> {
        match self {
            InnoError::Connection(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for InnoError {
    fn from(err: config::ConfigError) -> Self {
        InnoError::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for InnoError {
    fn from(err: std::io::Error) -> Self {
        InnoError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for InnoError {
    fn from(err: anyhow::Error) -> Self {
        InnoError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests;
