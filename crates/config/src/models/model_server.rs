use config::Config;
use inno_errors::InnoResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults::{
    source_key, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MODEL_SERVER_PORT_KEY,
    MODEL_SERVER_URL_KEY,
};
use crate::environment::EnvSource;
use crate::validation::{ConfigValidator, ValidationUtils};

/// 模型服务地址配置
///
/// 主机与端口分别由 `MODEL_SERVER_URL` 和 `MODEL_SERVER_PORT` 覆盖。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelServerSettings {
    #[serde(rename = "model_server_url")]
    pub host: String,
    #[serde(rename = "model_server_port")]
    pub port: u16,
}

impl ModelServerSettings {
    pub fn load(source: &EnvSource, default_host: &str, default_port: u16) -> InnoResult<Self> {
        let settings: ModelServerSettings = Config::builder()
            .set_default(source_key(MODEL_SERVER_URL_KEY), default_host)?
            .set_default(source_key(MODEL_SERVER_PORT_KEY), i64::from(default_port))?
            .add_source(source.to_environment())
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(
            "Resolved model server setting: host={}, port={}",
            settings.host, settings.port
        );
        Ok(settings)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl Default for ModelServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

impl ConfigValidator for ModelServerSettings {
    fn validate(&self) -> InnoResult<()> {
        ValidationUtils::validate_not_empty(&self.host, MODEL_SERVER_URL_KEY)?;
        ValidationUtils::validate_port(self.port, MODEL_SERVER_PORT_KEY)?;
        Ok(())
    }
}
