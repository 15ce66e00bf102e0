//! Schedulable units of work
//!
//! A [`Task`] has a fixed priority, receives a [`LogSink`] before it runs, and
//! reports a boolean outcome. Ordinary check failures are `Ok(false)`; only
//! unexpected faults come back as [`TaskError`].

mod check;
mod sink;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Priority;

pub use check::{CheckTask, DEFAULT_USER_AGENT, ProbeSettings};
pub use sink::{ChannelSink, LogSink, RecordingSink, SharedSink};

/// Unexpected failure inside a task body
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task hit a condition it cannot turn into an outcome
    #[error("task fault: {0}")]
    Fault(String),

    /// The task panicked while executing
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// A unit of work the scheduler can order and run
#[async_trait]
pub trait Task: Send + Sync {
    /// Priority used for queue ordering
    fn priority(&self) -> Priority;

    /// Identifier of the thing this task works on
    fn identifier(&self) -> &str;

    /// Attach the sink log lines go to, replacing any previous one
    fn attach_log_sink(&mut self, sink: SharedSink);

    /// Run the task and report its outcome
    async fn execute(&self) -> Result<bool, TaskError>;
}
