//! Completion handles
//!
//! A [`CompletionHandle`] follows one dispatched task through the pool. State
//! lives in a `watch` channel shared by the handle and the pool worker. Both
//! sides only ever move an unsettled state forward, so the first final state
//! written wins: a cancel accepted by [`CompletionHandle::cancel`] sticks even
//! when the task body finishes before the abort lands.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::{oneshot, watch};

use crate::models::Priority;

/// Lifecycle of a dispatched task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Handed to the pool, waiting for a worker
    Dispatched,
    /// A worker is executing the task body
    Running,
    /// Finished with a `true` outcome
    Succeeded,
    /// Finished with a `false` outcome
    Failed,
    /// The task body returned an error or panicked
    Faulted,
    /// Cancelled before it could finish
    Cancelled,
}

impl TaskState {
    /// Whether the task reached a final state
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Dispatched | Self::Running)
    }

    /// Whether the task counts as a success in a tally
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatched => write!(f, "dispatched"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Faulted => write!(f, "faulted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Handle to one dispatched task
#[derive(Debug)]
pub struct CompletionHandle {
    seq: u64,
    priority: Priority,
    identifier: String,
    state: Arc<watch::Sender<TaskState>>,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl CompletionHandle {
    pub(super) fn new(
        seq: u64,
        priority: Priority,
        identifier: String,
        state: Arc<watch::Sender<TaskState>>,
        cancel: oneshot::Sender<()>,
    ) -> Self {
        Self {
            seq,
            priority,
            identifier,
            state,
            cancel: Mutex::new(Some(cancel)),
        }
    }

    /// Dispatch sequence number, unique per scheduler and increasing in
    /// the order tasks were handed to the pool
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Priority of the dispatched task
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Identifier of the dispatched task
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Current state without waiting
    #[must_use]
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// Whether the task reached a final state
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// Request cancellation
    ///
    /// An accepted request settles the handle as [`TaskState::Cancelled`]
    /// right away and asks the worker to abort the body. Returns `false` when
    /// the task had already settled.
    pub fn cancel(&self) -> bool {
        if !advance(&self.state, TaskState::Cancelled) {
            return false;
        }
        if let Some(tx) = self.cancel.lock().unwrap_or_else(PoisonError::into_inner).take() {
            // The worker may already be gone; the state above is what counts
            let _ = tx.send(());
        }
        true
    }

    /// Wait until the task settles
    pub async fn settled(&self) -> TaskState {
        let mut state = self.state.subscribe();
        match state.wait_for(|s| s.is_settled()).await {
            Ok(settled) => *settled,
            Err(_) => TaskState::Cancelled,
        }
    }
}

/// Move an unsettled state to `next`
///
/// Returns `false`, leaving the state alone, when it already settled.
pub(super) fn advance(state: &watch::Sender<TaskState>, next: TaskState) -> bool {
    state.send_if_modified(|current| {
        if current.is_settled() {
            return false;
        }
        *current = next;
        true
    })
}
