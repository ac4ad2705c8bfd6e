pub mod defaults;
pub mod environment;
pub mod models;
pub mod validation;

pub use defaults::*;
pub use environment::EnvSource;
pub use models::{ExecutorConfig, ModelServerSettings, StorageSettings};
pub use validation::{ConfigValidator, ValidationUtils};
