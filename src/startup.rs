use std::path::PathBuf;

use inno_config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use inno_connect::EndpointResolver;
use inno_errors::InnoResult;
use tracing::{error, info};

/// 加载模型前必须确认的目标：本地模型目录与可达的模型服务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelServerTarget {
    pub models_dir: PathBuf,
    pub server_url: String,
}

/// 依次检查模型目录与模型服务，任一失败即中止
///
/// 服务探测会阻塞当前线程；在 tokio 运行时中请使用 [`preflight_async`]。
pub fn preflight(resolver: &EndpointResolver) -> InnoResult<ModelServerTarget> {
    info!("开始启动前检查");
    let models_dir = resolver.models_directory().inspect_err(|e| {
        error!("模型目录检查失败: {e}");
    })?;
    let server_url = resolver.default_server_url()?;

    info!(
        "启动前检查通过: models_dir={}, server_url={}",
        models_dir.display(),
        server_url
    );
    Ok(ModelServerTarget {
        models_dir,
        server_url,
    })
}

pub async fn preflight_async(resolver: &EndpointResolver) -> InnoResult<ModelServerTarget> {
    info!("开始启动前检查");
    let models_dir = resolver.models_directory().inspect_err(|e| {
        error!("模型目录检查失败: {e}");
    })?;
    let server_url = resolver
        .server_url_async(DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT)
        .await?;

    info!(
        "启动前检查通过: models_dir={}, server_url={}",
        models_dir.display(),
        server_url
    );
    Ok(ModelServerTarget {
        models_dir,
        server_url,
    })
}
