use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::future::{FutureExt, LocalBoxFuture};

use crate::report::TaskOutcome;

/// 任务体的返回值；错误只会被上报，不会回传给提交方
pub type TaskResult = anyhow::Result<()>;

type BlockingFn = Box<dyn FnOnce() -> TaskResult + Send + 'static>;
type AsyncFn = Box<dyn FnOnce() -> LocalBoxFuture<'static, TaskResult> + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Blocking,
    Async,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Blocking => write!(f, "blocking"),
            TaskKind::Async => write!(f, "async"),
        }
    }
}

/// 提交给执行器的任务，同步还是异步由调用方显式选择
pub enum BackgroundTask {
    /// 在工作线程上直接调用
    Blocking(BlockingFn),
    /// 在工作线程上新建单线程运行时并执行到结束
    Async(AsyncFn),
}

impl BackgroundTask {
    pub fn blocking<F>(f: F) -> Self
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        Self::Blocking(Box::new(f))
    }

    /// `f` 在工作线程上被调用，产生的 future 不需要是 `Send`
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + 'static,
    {
        Self::Async(Box::new(move || f().boxed_local()))
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            BackgroundTask::Blocking(_) => TaskKind::Blocking,
            BackgroundTask::Async(_) => TaskKind::Async,
        }
    }

    /// 在当前线程执行任务，错误与 panic 都转换为 [`TaskOutcome`]
    pub(crate) fn run(self) -> TaskOutcome {
        match self {
            BackgroundTask::Blocking(f) => outcome_of(panic::catch_unwind(AssertUnwindSafe(f))),
            BackgroundTask::Async(f) => {
                // 每个异步任务独占一个运行时，不与提交方或其他任务共享定时器等资源
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => return TaskOutcome::RuntimeUnavailable(e.to_string()),
                };
                outcome_of(panic::catch_unwind(AssertUnwindSafe(|| runtime.block_on(f()))))
            }
        }
    }
}

impl fmt::Debug for BackgroundTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BackgroundTask").field(&self.kind()).finish()
    }
}

fn outcome_of(result: std::thread::Result<TaskResult>) -> TaskOutcome {
    match result {
        Ok(Ok(())) => TaskOutcome::Completed,
        Ok(Err(e)) => TaskOutcome::Failed(format!("{e:#}")),
        Err(payload) => TaskOutcome::Panicked(panic_message(&*payload)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use anyhow::{anyhow, Context};

    use super::*;

    #[test]
    fn test_blocking_outcomes() {
        assert_eq!(BackgroundTask::blocking(|| Ok(())).run(), TaskOutcome::Completed);

        let outcome = BackgroundTask::blocking(|| {
            Err::<(), _>(anyhow!("disk full")).context("saving model weights")
        })
        .run();
        assert_eq!(
            outcome,
            TaskOutcome::Failed("saving model weights: disk full".to_string())
        );

        let outcome = BackgroundTask::blocking(|| panic!("worker exploded")).run();
        assert_eq!(outcome, TaskOutcome::Panicked("worker exploded".to_string()));
    }

    #[test]
    fn test_async_task_runs_on_its_own_runtime() {
        let outcome = BackgroundTask::future(|| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            // 独立运行时上可以使用非 Send 的值
            let counter = Rc::new(1);
            anyhow::ensure!(*counter == 1, "unexpected counter");
            Ok(())
        })
        .run();
        assert_eq!(outcome, TaskOutcome::Completed);
    }

    #[test]
    fn test_async_panic_is_caught() {
        let id = 7;
        let outcome = BackgroundTask::future(move || async move {
            if id == 7 {
                panic!("async task {id} failed");
            }
            Ok(())
        })
        .run();
        assert_eq!(outcome, TaskOutcome::Panicked("async task 7 failed".to_string()));
    }

    #[test]
    fn test_kind_and_id_display() {
        assert_eq!(BackgroundTask::blocking(|| Ok(())).kind(), TaskKind::Blocking);
        assert_eq!(
            BackgroundTask::future(|| async { Ok(()) }).kind(),
            TaskKind::Async
        );
        assert_eq!(TaskId::new(3).to_string(), "task-3");
        assert_eq!(TaskKind::Async.to_string(), "async");
    }
}
