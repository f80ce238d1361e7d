//! Background write queue.
//!
//! Runs remote writes (tree saves and record repairs) off the caller's
//! thread. A single worker drains a FIFO queue, so writes reach the record
//! store in the order they were submitted. Each job runs once; a job that
//! fails or panics is logged and dropped.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::error;

/// Error returned when a job cannot be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue is at capacity.
    #[error("background write queue is full")]
    Full,
    /// The queue has been shut down.
    #[error("background write queue is shut down")]
    ShutDown,
    /// The worker thread could not be started.
    #[error("background write worker is not running")]
    NoWorker,
}

/// Queue metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Jobs waiting to run.
    pub queue_depth: usize,
    /// Jobs currently running (0 or 1).
    pub active_jobs: usize,
    /// Jobs finished since the queue was created, including failed ones.
    pub jobs_completed: u64,
}

struct Job {
    name: &'static str,
    work: Box<dyn FnOnce() + Send>,
}

struct QueueInner {
    jobs: Mutex<VecDeque<Job>>,
    work_ready: Condvar,
    drain_cond: Condvar,
    shutdown: AtomicBool,
    queue_depth: AtomicUsize,
    active_jobs: AtomicUsize,
    jobs_completed: AtomicU64,
    max_queue_depth: usize,
}

/// Single-worker FIFO queue for fire-and-forget writes.
pub struct WriteQueue {
    inner: Arc<QueueInner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WriteQueue {
    /// Create a queue holding at most `max_queue_depth` waiting jobs.
    ///
    /// The worker thread is named `prefsync-writer`. If it cannot be
    /// spawned, the failure is logged and every `submit` returns
    /// [`QueueError::NoWorker`].
    pub fn new(max_queue_depth: usize) -> Self {
        let inner = Arc::new(QueueInner {
            jobs: Mutex::new(VecDeque::new()),
            work_ready: Condvar::new(),
            drain_cond: Condvar::new(),
            shutdown: AtomicBool::new(false),
            queue_depth: AtomicUsize::new(0),
            active_jobs: AtomicUsize::new(0),
            jobs_completed: AtomicU64::new(0),
            max_queue_depth,
        });

        let inner_clone = Arc::clone(&inner);
        let worker = match std::thread::Builder::new()
            .name("prefsync-writer".to_string())
            .spawn(move || worker_loop(&inner_clone))
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, "failed to spawn background write worker");
                None
            }
        };

        Self {
            inner,
            worker: Mutex::new(worker),
        }
    }

    /// Queue a job.
    ///
    /// `name` labels the job in logs.
    pub fn submit(
        &self,
        name: &'static str,
        work: impl FnOnce() + Send + 'static,
    ) -> Result<(), QueueError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            return Err(QueueError::ShutDown);
        }
        if self.worker.lock().is_none() {
            return Err(QueueError::NoWorker);
        }

        {
            let mut jobs = self.inner.jobs.lock();
            if jobs.len() >= self.inner.max_queue_depth {
                return Err(QueueError::Full);
            }
            jobs.push_back(Job {
                name,
                work: Box::new(work),
            });
            self.inner.queue_depth.fetch_add(1, Ordering::Release);
        }

        self.inner.work_ready.notify_one();
        Ok(())
    }

    /// Block until all queued and running jobs have finished.
    ///
    /// The worker keeps running afterwards.
    pub fn drain(&self) {
        if self.worker.lock().is_none() {
            return;
        }
        let mut jobs = self.inner.jobs.lock();
        while !jobs.is_empty() || self.inner.active_jobs.load(Ordering::Acquire) > 0 {
            self.inner.drain_cond.wait(&mut jobs);
        }
    }

    /// Stop accepting jobs, run what is queued, and join the worker.
    ///
    /// Called from a job on the worker itself, the worker is left to finish
    /// the queue and exit on its own.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::Release);
        {
            let _jobs = self.inner.jobs.lock();
            self.inner.work_ready.notify_all();
        }
        if let Some(handle) = self.worker.lock().take() {
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
        }
    }

    /// Current metrics.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            queue_depth: self.inner.queue_depth.load(Ordering::Acquire),
            active_jobs: self.inner.active_jobs.load(Ordering::Acquire),
            jobs_completed: self.inner.jobs_completed.load(Ordering::Acquire),
        }
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(inner: &QueueInner) {
    loop {
        let job = {
            let mut jobs = inner.jobs.lock();
            loop {
                if let Some(job) = jobs.pop_front() {
                    inner.queue_depth.fetch_sub(1, Ordering::Release);
                    // Marked active while the lock is held so drain never
                    // sees an empty queue with the job in flight unaccounted.
                    inner.active_jobs.fetch_add(1, Ordering::Release);
                    break job;
                }
                if inner.shutdown.load(Ordering::Acquire) {
                    return;
                }
                inner.work_ready.wait(&mut jobs);
            }
        };

        let name = job.name;
        if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job.work)).is_err() {
            error!(job = name, "background write panicked");
        }

        {
            let _jobs = inner.jobs.lock();
            inner.active_jobs.fetch_sub(1, Ordering::Release);
            inner.jobs_completed.fetch_add(1, Ordering::Release);
            inner.drain_cond.notify_all();
        }
    }
}
