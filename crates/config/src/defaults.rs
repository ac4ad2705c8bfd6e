//! 环境变量键名与默认值
//!
//! 所有键名与部署脚本保持一致，修改前需要同步更新部署文档。

use std::time::Duration;

/// 模型目录覆盖键
pub const UPLOAD_DIR_KEY: &str = "UPLOAD_DIR";
/// 模型服务主机覆盖键
pub const MODEL_SERVER_URL_KEY: &str = "MODEL_SERVER_URL";
/// 模型服务端口覆盖键
pub const MODEL_SERVER_PORT_KEY: &str = "MODEL_SERVER_PORT";

/// 只有这些键（区分大小写）会被读取
pub const ENV_KEYS: [&str; 3] = [UPLOAD_DIR_KEY, MODEL_SERVER_URL_KEY, MODEL_SERVER_PORT_KEY];

pub const DEFAULT_MODELS_DIR: &str = "/workspace/models/inno";
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 11434;

/// 连通性探测的固定超时
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const MAX_WORKERS_LIMIT: usize = 1024;
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "inno-bg";

/// `config` 会把环境变量键名转为小写
pub(crate) fn source_key(env_key: &str) -> String {
    env_key.to_lowercase()
}
