//! Fixed-size pool of OS worker threads fed by a shared FIFO queue.

use std::sync::{mpsc, Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use inno_errors::{InnoError, InnoResult};
use tracing::{debug, error};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

pub(crate) struct WorkerPool {
    tx: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    live: LiveWorkers,
}

/// 存活工作线程计数，线程退出时递减并唤醒等待方
#[derive(Clone, Default)]
pub(crate) struct LiveWorkers {
    state: Arc<(Mutex<usize>, Condvar)>,
}

impl LiveWorkers {
    fn register(&self) -> LiveGuard {
        let (count, _) = &*self.state;
        *count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        LiveGuard(self.clone())
    }

    /// 阻塞直到所有工作线程退出
    pub(crate) fn wait_idle(&self) {
        let (count, exited) = &*self.state;
        let mut live = count.lock().unwrap_or_else(PoisonError::into_inner);
        while *live > 0 {
            live = exited.wait(live).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

struct LiveGuard(LiveWorkers);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        let (count, exited) = &*self.0.state;
        let mut live = count.lock().unwrap_or_else(PoisonError::into_inner);
        *live = live.saturating_sub(1);
        exited.notify_all();
    }
}

impl WorkerPool {
    pub(crate) fn new(size: usize, name_prefix: &str) -> InnoResult<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let shared_rx = Arc::new(Mutex::new(rx));
        let live = LiveWorkers::default();

        let mut workers = Vec::with_capacity(size);
        for index in 0..size {
            let rx = Arc::clone(&shared_rx);
            // 先于线程启动登记，等待方不会错过尚未运行的线程
            let guard = live.register();
            // 部分线程创建失败时 tx 随之释放，已创建的线程会自行退出
            let handle = thread::Builder::new()
                .name(format!("{name_prefix}-{index}"))
                .spawn(move || {
                    let _guard = guard;
                    worker_loop(rx)
                })
                .map_err(|e| InnoError::internal(format!("failed to spawn worker thread: {e}")))?;
            workers.push(handle);
        }

        debug!("Started {} background worker threads", size);
        Ok(Self { tx, workers, live })
    }

    pub(crate) fn live_workers(&self) -> LiveWorkers {
        self.live.clone()
    }

    pub(crate) fn thread_ids(&self) -> Vec<ThreadId> {
        self.workers.iter().map(|handle| handle.thread().id()).collect()
    }

    pub(crate) fn execute(&self, job: Job) -> InnoResult<()> {
        self.tx
            .send(job)
            .map_err(|_| InnoError::internal("all background workers have exited"))
    }

    /// Closes the queue, lets workers drain it and joins them.
    pub(crate) fn join(self) {
        let Self { tx, workers, .. } = self;
        drop(tx);

        let current = thread::current().id();
        for handle in workers {
            if handle.thread().id() == current {
                // 在任务内部关闭执行器时不能等待自身
                continue;
            }
            let name = handle.thread().name().unwrap_or("unnamed").to_string();
            if handle.join().is_err() {
                error!("Background worker {} terminated abnormally", name);
            }
        }
    }
}

fn worker_loop(rx: Arc<Mutex<mpsc::Receiver<Job>>>) {
    loop {
        // 锁只在取任务期间持有，任务在锁外执行
        let job = rx.lock().unwrap_or_else(PoisonError::into_inner).recv();

        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
    debug!(
        "Background worker {} exiting",
        thread::current().name().unwrap_or("unnamed")
    );
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_pool_drains_queue_on_join() {
        let pool = WorkerPool::new(2, "pool-test").unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            pool.execute(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.join();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_worker_threads_are_named() {
        let pool = WorkerPool::new(1, "named").unwrap();
        let (tx, rx) = mpsc::channel();
        pool.execute(Box::new(move || {
            let _ = tx.send(thread::current().name().map(str::to_string));
        }))
        .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("named-0"));
        pool.join();
    }

    #[test]
    fn test_wait_idle_returns_after_workers_exit() {
        let pool = WorkerPool::new(2, "idle").unwrap();
        let live = pool.live_workers();
        assert_eq!(pool.thread_ids().len(), 2);

        let (tx, rx) = mpsc::channel();
        let joiner = thread::spawn(move || pool.join());
        let waiter = thread::spawn(move || {
            live.wait_idle();
            tx.send(()).unwrap();
        });

        rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        joiner.join().unwrap();
        waiter.join().unwrap();
    }
}
