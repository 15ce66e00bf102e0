//! Priority task scheduler
//!
//! Orders submitted [`Task`]s by priority, hands them to a fixed-size worker
//! pool, and keeps a [`CompletionHandle`] for every dispatched task until a
//! report reaps it.
//!
//! ## Blocking calls
//!
//! [`Scheduler::await_completion`], [`Scheduler::report`] and
//! [`Scheduler::shutdown`] block the calling thread on the scheduler's own
//! runtime. Call them from plain threads, never from inside an async context.
//! Every other operation returns immediately.
//!
//! Those waits run on a separate single-threaded runtime with its own timer,
//! so their deadlines hold even while task bodies occupy every pool thread.
//!
//! ## Locking
//!
//! The queue and the outstanding-handle collection each sit behind a mutex.
//! A dispatch sweep holds the collection lock for the whole sweep and takes
//! the queue lock once per popped task, so concurrent `submit` calls only
//! ever wait for a single pop. Task bodies run outside both locks.

mod handle;
mod pool;
mod queue;
mod summary;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{oneshot, watch};

use crate::task::{SharedSink, Task};

pub use handle::{CompletionHandle, TaskState};
pub use summary::{Scoreboard, WaitSummary};

use pool::{Job, StateWriter, WorkerPool};
use queue::TaskQueue;

/// Default number of pool workers
pub const DEFAULT_WORKERS: usize = 10;

/// Default time `shutdown` lets in-flight work finish
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// How long the runtime gets to tear down after the grace period
const RUNTIME_TEARDOWN: Duration = Duration::from_secs(1);

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler no longer accepts work
    #[error("scheduler is shut down")]
    ShutDown,

    /// The worker runtime could not be started
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Scheduler construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Worker pool size (also the runtime's thread count)
    pub workers: usize,
    /// How long `shutdown` waits before cancelling what is left
    pub shutdown_grace: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

/// Priority-ordered scheduler over a fixed worker pool
#[derive(Debug)]
pub struct Scheduler {
    runtime: RwLock<Option<Runtime>>,
    waiter: Runtime,
    pool: WorkerPool,
    queue: Mutex<TaskQueue>,
    outstanding: Mutex<Vec<Arc<CompletionHandle>>>,
    reporting: Mutex<()>,
    next_seq: AtomicU64,
    shutdown_grace: Duration,
    closed: AtomicBool,
}

impl Scheduler {
    /// Start a scheduler and its worker pool
    pub fn new(options: SchedulerOptions) -> Result<Self, SchedulerError> {
        let workers = options.workers.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("sentinel-worker")
            .enable_all()
            .build()?;
        let waiter = Builder::new_current_thread().enable_time().build()?;
        let pool = WorkerPool::start(runtime.handle(), workers);
        info!("scheduler started with {workers} worker(s)");

        Ok(Self {
            runtime: RwLock::new(Some(runtime)),
            waiter,
            pool,
            queue: Mutex::new(TaskQueue::default()),
            outstanding: Mutex::new(Vec::new()),
            reporting: Mutex::new(()),
            next_seq: AtomicU64::new(0),
            shutdown_grace: options.shutdown_grace,
            closed: AtomicBool::new(false),
        })
    }

    /// Start a scheduler with default options
    pub fn with_defaults() -> Result<Self, SchedulerError> {
        Self::new(SchedulerOptions::default())
    }

    /// Queue a task
    pub fn submit(&self, task: Box<dyn Task>) -> Result<(), SchedulerError> {
        if self.is_shut_down() {
            return Err(SchedulerError::ShutDown);
        }
        lock(&self.queue).push(task);
        Ok(())
    }

    /// Number of tasks waiting for dispatch
    #[must_use]
    pub fn queued(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Number of handles not yet reaped
    #[must_use]
    pub fn outstanding(&self) -> usize {
        lock(&self.outstanding).len()
    }

    /// Whether `shutdown` has been called
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Drain the queue onto the worker pool
    ///
    /// Settled handles left over from earlier cycles are discarded first.
    /// Tasks are handed over highest priority first (FIFO among equals), each
    /// with `sink` attached. Returns the handles created by this sweep, in
    /// dispatch order.
    pub fn dispatch_all(
        &self,
        sink: SharedSink,
    ) -> Result<Vec<Arc<CompletionHandle>>, SchedulerError> {
        if self.is_shut_down() {
            return Err(SchedulerError::ShutDown);
        }

        let mut outstanding = lock(&self.outstanding);
        let before = outstanding.len();
        outstanding.retain(|handle| !handle.is_settled());
        let swept = before - outstanding.len();
        if swept > 0 {
            debug!("discarded {swept} settled handle(s)");
        }

        let mut dispatched = Vec::new();
        loop {
            let Some(mut task) = lock(&self.queue).pop() else {
                break;
            };
            task.attach_log_sink(Arc::clone(&sink));

            let state = Arc::new(watch::Sender::new(TaskState::Dispatched));
            let (cancel_tx, cancel_rx) = oneshot::channel();
            let handle = Arc::new(CompletionHandle::new(
                self.next_seq.fetch_add(1, Ordering::SeqCst),
                task.priority(),
                task.identifier().to_string(),
                Arc::clone(&state),
                cancel_tx,
            ));

            let job = Job {
                task,
                state: StateWriter::new(state),
                cancel: cancel_rx,
            };
            if let Err(rejected) = self.pool.submit(job) {
                // Shutdown closed the intake mid-sweep
                lock(&self.queue).push(rejected.task);
                return Err(SchedulerError::ShutDown);
            }

            outstanding.push(Arc::clone(&handle));
            dispatched.push(handle);
        }

        debug!("dispatched {} task(s), {} outstanding", dispatched.len(), outstanding.len());
        Ok(dispatched)
    }

    /// Wait for every outstanding task, at most `timeout`
    ///
    /// Works on a snapshot taken at call time. When the deadline fires, every
    /// task in the snapshot that has not settled is cancelled and counted as a
    /// failure. Handles stay outstanding until a report reaps them.
    #[must_use]
    pub fn await_completion(&self, timeout: Duration) -> WaitSummary {
        let snapshot = lock(&self.outstanding).clone();
        if snapshot.is_empty() {
            return WaitSummary::default();
        }

        let timed_out = self
            .block_on(async {
                tokio::time::timeout(timeout, settle_all(&snapshot)).await.is_err()
            })
            .unwrap_or(false);

        let mut summary = WaitSummary {
            timed_out,
            ..WaitSummary::default()
        };
        let mut cancelled = 0;
        for handle in &snapshot {
            let state = handle.state();
            if !state.is_settled() {
                if handle.cancel() {
                    cancelled += 1;
                }
                summary.failed += 1;
            } else if state.is_success() {
                summary.success += 1;
            } else {
                summary.failed += 1;
            }
        }

        if timed_out {
            warn!("wait timed out after {timeout:?}; cancelled {cancelled} task(s)");
        }
        summary
    }

    /// Wait for every outstanding task, tally, and reap the handles
    ///
    /// No timeout. Failed, faulted and cancelled tasks count as failures.
    /// Handles reaped here are never counted again.
    #[must_use]
    pub fn report(&self) -> Scoreboard {
        let _reporting = lock(&self.reporting);

        let snapshot = lock(&self.outstanding).clone();
        if !snapshot.is_empty() {
            self.block_on(settle_all(&snapshot));
        }

        let board = Scoreboard::tally(snapshot.iter().map(|handle| handle.state()));
        let reaped: HashSet<u64> = snapshot.iter().map(|handle| handle.seq()).collect();
        lock(&self.outstanding).retain(|handle| !reaped.contains(&handle.seq()));

        info!("report: {} online, {} offline", board.success, board.failed);
        board
    }

    /// Stop the scheduler
    ///
    /// Refuses further work, lets dispatched work finish for up to the grace
    /// period, cancels whatever is still unsettled, then tears down the
    /// runtime. Tasks that were queued but never dispatched are dropped.
    /// Calling it again does nothing.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.pool.close();
        let dropped = lock(&self.queue).clear();
        if dropped > 0 {
            warn!("shutdown: dropped {dropped} task(s) that were never dispatched");
        }

        let workers = self.pool.take_workers();
        let grace = self.shutdown_grace;
        let drained = self
            .block_on(async move {
                tokio::time::timeout(grace, async {
                    for worker in workers {
                        let _ = worker.await;
                    }
                })
                .await
                .is_ok()
            })
            .unwrap_or(true);

        if !drained {
            let pending = lock(&self.outstanding).clone();
            let cancelled = pending.iter().filter(|handle| handle.cancel()).count();
            warn!("shutdown: grace period of {grace:?} expired; cancelled {cancelled} task(s)");
        }

        let runtime = self.runtime.write().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(runtime) = runtime {
            runtime.shutdown_timeout(RUNTIME_TEARDOWN);
        }
        info!("scheduler shut down");
    }

    /// Run a future to completion on the waiter runtime
    ///
    /// Returns `None` once the pool runtime has been torn down; callers then
    /// read handle states as they are.
    fn block_on<F: Future>(&self, future: F) -> Option<F::Output> {
        // Held so shutdown cannot tear the pool down mid-wait
        let runtime = self.runtime.read().unwrap_or_else(PoisonError::into_inner);
        if runtime.is_none() {
            debug!("scheduler is shut down; not waiting");
            return None;
        }
        Some(self.waiter.block_on(future))
    }
}

async fn settle_all(handles: &[Arc<CompletionHandle>]) {
    for handle in handles {
        handle.settled().await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
