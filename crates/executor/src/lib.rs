//! 后台任务执行器
//!
//! 把阻塞调用或异步任务交给固定大小的工作线程池执行，调用方所在的 tokio
//! 运行时不会被阻塞。提交即返回，任务结果通过 [`OutcomeSink`] 上报。

pub mod executor;
mod pool;
pub mod report;
pub mod task;

pub use executor::{BackgroundExecutor, BackgroundExecutorBuilder};
pub use report::{ChannelSink, DiscardSink, LogSink, OutcomeSink, TaskOutcome, TaskReport};
pub use task::{BackgroundTask, TaskId, TaskKind, TaskResult};
