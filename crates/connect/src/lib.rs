//! 模型目录解析与模型服务连通性检查
//!
//! 所有操作都是一次性的：配置在调用时读取，探测只尝试一次，不做重试。

pub mod probe;
pub mod resolver;

pub use probe::{probe_endpoint, probe_endpoint_async, EndpointProbe};
pub use resolver::{resolve_models_directory, resolve_server_url, EndpointResolver};
