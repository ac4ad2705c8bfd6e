//! 模型服务支撑组件
//!
//! - [`connect`]：模型目录解析与模型服务连通性检查
//! - [`executor`]：把阻塞或异步工作交给固定线程池的后台执行器
//! - [`startup`]：启动前的目录与服务检查
//! - [`logging`]：日志初始化

pub mod logging;
pub mod startup;

pub use inno_config as config;
pub use inno_connect as connect;
pub use inno_errors as errors;
pub use inno_executor as executor;

pub use inno_config::EnvSource;
pub use inno_connect::EndpointResolver;
pub use inno_errors::{InnoError, InnoResult, ProbeError};
pub use inno_executor::{BackgroundExecutor, OutcomeSink, TaskOutcome, TaskReport};
pub use logging::{init_logging, LogFormat};
pub use startup::{preflight, preflight_async, ModelServerTarget};
