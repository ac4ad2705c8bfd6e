use inno_errors::InnoResult;
use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_MAX_WORKERS, DEFAULT_THREAD_NAME_PREFIX, MAX_WORKERS_LIMIT};
use crate::validation::{ConfigValidator, ValidationUtils};

/// 后台执行器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// 固定的工作线程数量，创建后不再调整
    pub max_workers: usize,
    /// 工作线程名前缀，线程名形如 `inno-bg-0`
    pub thread_name_prefix: String,
}

impl ExecutorConfig {
    pub fn with_max_workers(max_workers: usize) -> Self {
        Self {
            max_workers,
            ..Self::default()
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl ConfigValidator for ExecutorConfig {
    fn validate(&self) -> InnoResult<()> {
        ValidationUtils::validate_count(self.max_workers, "executor.max_workers", MAX_WORKERS_LIMIT)?;
        ValidationUtils::validate_not_empty(&self.thread_name_prefix, "executor.thread_name_prefix")?;
        Ok(())
    }
}
