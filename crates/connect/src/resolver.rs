use std::path::PathBuf;
use std::time::Duration;

use inno_config::{EnvSource, ModelServerSettings, StorageSettings};
use inno_config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use inno_errors::{InnoError, InnoResult};
use tracing::{error, info};

use crate::probe::EndpointProbe;

/// 解析模型目录与模型服务地址
///
/// 配置来源在每次调用时重新读取。
#[derive(Debug, Clone, Default)]
pub struct EndpointResolver {
    source: EnvSource,
    probe: EndpointProbe,
}

impl EndpointResolver {
    pub fn new(source: EnvSource) -> Self {
        Self {
            source,
            probe: EndpointProbe::default(),
        }
    }

    /// 读取进程环境变量的解析器
    pub fn from_env() -> Self {
        Self::new(EnvSource::Process)
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe = EndpointProbe::new(timeout);
        self
    }

    pub fn source(&self) -> &EnvSource {
        &self.source
    }

    /// 返回配置的模型目录；目录不存在时返回 `NotFound`
    pub fn models_directory(&self) -> InnoResult<PathBuf> {
        let dir = StorageSettings::load(&self.source)?.models_dir();
        if !dir.exists() {
            error!("Models folder not found: {}", dir.display());
            return Err(InnoError::not_found(dir));
        }
        info!("Using models folder {}", dir.display());
        Ok(dir)
    }

    /// 构造 `http://<host>:<port>/` 并同步探测，探测成功后返回该地址
    pub fn server_url(&self, default_host: &str, default_port: u16) -> InnoResult<String> {
        let url = ModelServerSettings::load(&self.source, default_host, default_port)?.base_url();
        self.probe.probe(&url).inspect_err(|e| {
            error!("Model server check failed: {}", e);
        })
    }

    pub async fn server_url_async(&self, default_host: &str, default_port: u16) -> InnoResult<String> {
        let url = ModelServerSettings::load(&self.source, default_host, default_port)?.base_url();
        self.probe.probe_async(&url).await.inspect_err(|e| {
            error!("Model server check failed: {}", e);
        })
    }

    /// 使用默认主机 `127.0.0.1` 与端口 `11434`
    pub fn default_server_url(&self) -> InnoResult<String> {
        self.server_url(DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT)
    }
}

/// 从进程环境解析模型目录
pub fn resolve_models_directory() -> InnoResult<PathBuf> {
    EndpointResolver::from_env().models_directory()
}

/// 从进程环境解析并探测模型服务地址
pub fn resolve_server_url(default_host: &str, default_port: u16) -> InnoResult<String> {
    EndpointResolver::from_env().server_url(default_host, default_port)
}
