use std::path::PathBuf;

use config::Config;
use inno_errors::InnoResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults::{source_key, DEFAULT_MODELS_DIR, UPLOAD_DIR_KEY};
use crate::environment::EnvSource;

/// 模型存储目录配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: String,
}

impl StorageSettings {
    /// 从给定来源读取 `UPLOAD_DIR`，缺省为 `/workspace/models/inno`
    pub fn load(source: &EnvSource) -> InnoResult<Self> {
        let settings: StorageSettings = Config::builder()
            .set_default(source_key(UPLOAD_DIR_KEY), DEFAULT_MODELS_DIR)?
            .add_source(source.to_environment())
            .build()?
            .try_deserialize()?;

        debug!("Resolved models directory setting: {}", settings.upload_dir);
        Ok(settings)
    }

    pub fn models_dir(&self) -> PathBuf {
        PathBuf::from(&self.upload_dir)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: DEFAULT_MODELS_DIR.to_string(),
        }
    }
}
