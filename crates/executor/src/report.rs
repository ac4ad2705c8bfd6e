use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::task::{TaskId, TaskKind};

/// 单个任务的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    /// 任务体返回了错误
    Failed(String),
    /// 任务体发生 panic，已在工作线程内捕获
    Panicked(String),
    /// 无法为异步任务创建独立运行时
    RuntimeUnavailable(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Completed)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            TaskOutcome::Completed => None,
            TaskOutcome::Failed(msg)
            | TaskOutcome::Panicked(msg)
            | TaskOutcome::RuntimeUnavailable(msg) => Some(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskReport {
    pub id: TaskId,
    pub label: String,
    pub kind: TaskKind,
    /// 执行该任务的工作线程名
    pub worker: String,
    pub elapsed: Duration,
    pub outcome: TaskOutcome,
}

/// 任务结果的去向
///
/// 执行器把每份报告投递到创建时传入的运行时上，再调用 `record`。
pub trait OutcomeSink: Send + Sync + 'static {
    fn record(&self, report: TaskReport);
}

impl<F> OutcomeSink for F
where
    F: Fn(TaskReport) + Send + Sync + 'static,
{
    fn record(&self, report: TaskReport) {
        self(report)
    }
}

/// 默认去向：成功记 debug，失败记 error
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl OutcomeSink for LogSink {
    fn record(&self, report: TaskReport) {
        match &report.outcome {
            TaskOutcome::Completed => debug!(
                "Background {} {} ({}) completed on {} in {:?}",
                report.kind, report.id, report.label, report.worker, report.elapsed
            ),
            TaskOutcome::Failed(msg) => error!(
                "Background {} {} ({}) failed on {} after {:?}: {}",
                report.kind, report.id, report.label, report.worker, report.elapsed, msg
            ),
            TaskOutcome::Panicked(msg) => error!(
                "Background {} {} ({}) panicked on {}: {}",
                report.kind, report.id, report.label, report.worker, msg
            ),
            TaskOutcome::RuntimeUnavailable(msg) => error!(
                "Background {} {} ({}) could not start a runtime on {}: {}",
                report.kind, report.id, report.label, report.worker, msg
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl OutcomeSink for DiscardSink {
    fn record(&self, _report: TaskReport) {}
}

/// 把报告转发到 tokio 通道，便于调用方自行汇总
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TaskReport>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TaskReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutcomeSink for ChannelSink {
    fn record(&self, report: TaskReport) {
        if let Err(e) = self.tx.send(report) {
            debug!("Dropping report for {}: receiver closed", e.0.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn report(outcome: TaskOutcome) -> TaskReport {
        TaskReport {
            id: TaskId::new(1),
            label: "warmup".to_string(),
            kind: TaskKind::Blocking,
            worker: "inno-bg-0".to_string(),
            elapsed: Duration::from_millis(5),
            outcome,
        }
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(TaskOutcome::Completed.is_success());
        assert_eq!(TaskOutcome::Completed.message(), None);
        let failed = TaskOutcome::Failed("boom".to_string());
        assert!(!failed.is_success());
        assert_eq!(failed.message(), Some("boom"));
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |report: TaskReport| seen.lock().unwrap().push(report.outcome)
        };

        sink.record(report(TaskOutcome::Completed));
        sink.record(report(TaskOutcome::Panicked("oops".to_string())));
        LogSink.record(report(TaskOutcome::Failed("logged".to_string())));
        DiscardSink.record(report(TaskOutcome::Completed));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                TaskOutcome::Completed,
                TaskOutcome::Panicked("oops".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_reports() {
        let (sink, mut rx) = ChannelSink::new();
        sink.record(report(TaskOutcome::Completed));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.label, "warmup");
        assert!(received.outcome.is_success());

        drop(rx);
        sink.record(report(TaskOutcome::Completed));
    }
}
