//! Fixed-size worker pool
//!
//! `workers` job loops share one FIFO intake channel, so jobs start in the
//! order they were handed over and at most `workers` task bodies run at once.
//! Each body runs in its own spawned task so a panic or an abort only affects
//! that job.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::{Mutex as AsyncMutex, mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};

use super::handle::{TaskState, advance};
use crate::task::{Task, TaskError};

/// A task on its way to a worker
pub struct Job {
    pub task: Box<dyn Task>,
    pub state: StateWriter,
    pub cancel: oneshot::Receiver<()>,
}

/// Worker side of a handle's state
///
/// Settles the state as cancelled when dropped unsettled, which happens when
/// the runtime is torn down under a queued or running job.
pub struct StateWriter(Arc<watch::Sender<TaskState>>);

impl StateWriter {
    pub const fn new(state: Arc<watch::Sender<TaskState>>) -> Self {
        Self(state)
    }

    fn advance(&self, next: TaskState) -> bool {
        advance(&self.0, next)
    }

    fn current(&self) -> TaskState {
        *self.0.borrow()
    }
}

impl Drop for StateWriter {
    fn drop(&mut self) {
        self.advance(TaskState::Cancelled);
    }
}

impl Job {
    async fn run(self, worker: usize) {
        let Self {
            task,
            state,
            mut cancel,
        } = self;

        // Fails when the handle was cancelled while the job sat in the intake
        if !state.advance(TaskState::Running) {
            debug!("worker {worker}: skipping cancelled {}", task.identifier());
            return;
        }

        let identifier = task.identifier().to_string();
        let mut execution = tokio::spawn(async move { task.execute().await });

        let outcome = tokio::select! {
            joined = &mut execution => settle(&identifier, joined),
            Ok(()) = &mut cancel => {
                execution.abort();
                // Wait for the abort so the body's resources are released
                let _ = execution.await;
                TaskState::Cancelled
            },
        };
        // A cancel accepted by the handle already settled the state
        state.advance(outcome);
        debug!("worker {worker}: {identifier} {}", state.current());
    }
}

fn settle(identifier: &str, joined: Result<Result<bool, TaskError>, JoinError>) -> TaskState {
    match joined {
        Ok(Ok(true)) => TaskState::Succeeded,
        Ok(Ok(false)) => TaskState::Failed,
        Ok(Err(err)) => {
            warn!("{identifier}: {err}");
            TaskState::Faulted
        },
        Err(err) if err.is_cancelled() => TaskState::Cancelled,
        Err(err) => {
            warn!("{identifier}: {}", TaskError::Panicked(err.to_string()));
            TaskState::Faulted
        },
    }
}

/// The pool's intake and its worker loops
pub struct WorkerPool {
    intake: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Start `size` workers on `runtime`
    pub fn start(runtime: &Handle, size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let rx = Arc::new(AsyncMutex::new(rx));

        let workers = (0..size)
            .map(|worker| {
                let rx = Arc::clone(&rx);
                runtime.spawn(async move {
                    loop {
                        // Hold the intake lock only while waiting for the next job
                        let job = rx.lock().await.recv().await;
                        match job {
                            Some(job) => job.run(worker).await,
                            None => break,
                        }
                    }
                    debug!("worker {worker}: intake closed");
                })
            })
            .collect();

        Self {
            intake: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
        }
    }

    /// Hand a job to the pool
    ///
    /// Gives the job back when the intake is already closed.
    pub fn submit(&self, job: Job) -> Result<(), Job> {
        let intake = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
        match intake.as_ref() {
            Some(tx) => tx.send(job).map_err(|rejected| rejected.0),
            None => Err(job),
        }
    }

    /// Stop accepting jobs; workers exit once the backlog is drained
    pub fn close(&self) {
        self.intake.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Take the worker loop handles so the caller can wait on them
    pub fn take_workers(&self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = self.intake.lock().unwrap_or_else(PoisonError::into_inner).is_some();
        let workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("WorkerPool").field("open", &open).field("workers", &workers).finish()
    }
}
