use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Instant;

use inno_config::{ConfigValidator, ExecutorConfig};
use inno_errors::{InnoError, InnoResult};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::pool::{LiveWorkers, WorkerPool};
use crate::report::{LogSink, OutcomeSink, TaskReport};
use crate::task::{BackgroundTask, TaskId, TaskResult};

/// 后台任务执行器
///
/// 持有固定大小的工作线程池与所属 tokio 运行时的句柄。提交操作只把任务放入
/// 队列，不会阻塞调用方，也不会让出调用方的运行时。任务的错误与 panic 在
/// 工作线程内被捕获，生成 [`TaskReport`] 后投递回所属运行时交给 [`OutcomeSink`]。
pub struct BackgroundExecutor {
    pool: Mutex<Option<WorkerPool>>,
    live: LiveWorkers,
    worker_threads: Vec<ThreadId>,
    loop_handle: Handle,
    sink: Arc<dyn OutcomeSink>,
    worker_count: usize,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl BackgroundExecutor {
    /// 使用显式传入的运行时句柄创建执行器，结果交给 [`LogSink`]
    pub fn new(loop_handle: Handle, max_workers: usize) -> InnoResult<Self> {
        Self::builder(loop_handle).max_workers(max_workers).build()
    }

    /// 绑定当前所在的 tokio 运行时；不在运行时内调用时返回配置错误
    pub fn current(max_workers: usize) -> InnoResult<Self> {
        let handle = Handle::try_current().map_err(|e| {
            InnoError::config_error(format!("background executor requires a tokio runtime: {e}"))
        })?;
        Self::new(handle, max_workers)
    }

    pub fn builder(loop_handle: Handle) -> BackgroundExecutorBuilder {
        BackgroundExecutorBuilder {
            loop_handle,
            config: ExecutorConfig::default(),
            sink: Arc::new(LogSink),
        }
    }

    /// 提交阻塞任务，在工作线程上直接调用
    pub fn submit_blocking<F>(&self, label: impl Into<String>, f: F) -> InnoResult<TaskId>
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        self.submit(label, BackgroundTask::blocking(f))
    }

    /// 提交异步任务，工作线程为它单独创建单线程运行时
    pub fn submit_async<F, Fut>(&self, label: impl Into<String>, f: F) -> InnoResult<TaskId>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + 'static,
    {
        self.submit(label, BackgroundTask::future(f))
    }

    pub fn submit(&self, label: impl Into<String>, task: BackgroundTask) -> InnoResult<TaskId> {
        let label = label.into();
        let guard = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pool) = guard.as_ref() else {
            warn!("Rejecting background task '{}': executor is shut down", label);
            return Err(InnoError::DispatcherClosed);
        };

        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let kind = task.kind();
        let sink = Arc::clone(&self.sink);
        let loop_handle = self.loop_handle.clone();
        let job_label = label.clone();

        pool.execute(Box::new(move || {
            let started = Instant::now();
            let outcome = task.run();
            let report = TaskReport {
                id,
                label: job_label,
                kind,
                worker: thread::current().name().unwrap_or("unnamed").to_string(),
                elapsed: started.elapsed(),
                outcome,
            };
            // 运行时已关闭时报告会被丢弃
            loop_handle.spawn(async move { sink.record(report) });
        }))?;

        debug!("Submitted background {} {} ({})", kind, id, label);
        Ok(id)
    }

    /// 拒绝新任务，等待正在执行与已排队的任务全部结束后回收工作线程。
    ///
    /// 重复调用无副作用；并发调用的每个调用方都会等到工作线程全部退出。
    /// 在本执行器的任务内部调用时不会等待任务所在的工作线程。
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let pool = self
            .pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let owner = pool.is_some();
        if let Some(pool) = pool {
            info!(
                "Shutting down background executor, waiting for {} workers",
                self.worker_count
            );
            pool.join();
        } else {
            debug!("Background executor already shutting down");
        }

        if self.worker_threads.contains(&thread::current().id()) {
            return;
        }
        self.live.wait_idle();
        if owner {
            info!("Background executor stopped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn submitted_count(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for BackgroundExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundExecutor")
            .field("worker_count", &self.worker_count)
            .field("submitted", &self.submitted_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

pub struct BackgroundExecutorBuilder {
    loop_handle: Handle,
    config: ExecutorConfig,
    sink: Arc<dyn OutcomeSink>,
}

impl BackgroundExecutorBuilder {
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.config.max_workers = max_workers;
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn sink<S: OutcomeSink>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn build(self) -> InnoResult<BackgroundExecutor> {
        self.config.validate()?;
        let pool = WorkerPool::new(self.config.max_workers, &self.config.thread_name_prefix)?;
        let live = pool.live_workers();
        let worker_threads = pool.thread_ids();

        info!(
            "Background executor started with {} workers",
            self.config.max_workers
        );
        Ok(BackgroundExecutor {
            pool: Mutex::new(Some(pool)),
            live,
            worker_threads,
            loop_handle: self.loop_handle,
            sink: self.sink,
            worker_count: self.config.max_workers,
            next_id: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }
}
