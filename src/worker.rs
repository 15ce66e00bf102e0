//! Target worker
//!
//! Turns a [`TargetSet`] into tasks, feeds them to the shared [`Scheduler`],
//! and drives one scan cycle: generate, run, wait, report.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::models::{Priority, TargetSet};
use crate::scheduler::{Scheduler, SchedulerError, Scoreboard, WaitSummary};
use crate::task::{CheckTask, RecordingSink, SharedSink, Task};

/// Builds the task for one target
pub type TaskFactory = Box<dyn Fn(Priority, &str) -> Box<dyn Task> + Send + Sync>;

/// Feeds targets to a scheduler and collects their log lines
pub struct TargetWorker {
    scheduler: Arc<Scheduler>,
    factory: TaskFactory,
    targets: TargetSet,
    logs: RecordingSink,
}

impl TargetWorker {
    /// Create a worker using a custom task factory
    #[must_use]
    pub fn new(scheduler: Arc<Scheduler>, factory: TaskFactory) -> Self {
        Self {
            scheduler,
            factory,
            targets: TargetSet::new(),
            logs: RecordingSink::new(),
        }
    }

    /// Create a worker that runs HTTP checks with `client`
    #[must_use]
    pub fn with_probe(scheduler: Arc<Scheduler>, client: reqwest::Client) -> Self {
        Self::new(
            scheduler,
            Box::new(move |priority: Priority, url: &str| -> Box<dyn Task> {
                Box::new(CheckTask::new(priority, url.to_string(), client.clone()))
            }),
        )
    }

    /// Replace the current target set
    pub fn set_targets(&mut self, targets: TargetSet) {
        self.targets = targets;
    }

    /// The current target set
    #[must_use]
    pub const fn targets(&self) -> &TargetSet {
        &self.targets
    }

    /// The scheduler this worker feeds
    #[must_use]
    pub const fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Submit one task per target
    ///
    /// Every entry is submitted, duplicates included. Returns how many tasks
    /// were submitted.
    pub fn generate_tasks(&self) -> Result<usize, SchedulerError> {
        let mut submitted = 0;
        for target in self.targets.iter() {
            self.scheduler.submit((self.factory)(target.priority, &target.identifier))?;
            submitted += 1;
        }
        info!("submitted {submitted} task(s)");
        Ok(submitted)
    }

    /// Dispatch everything queued
    ///
    /// Clears the log buffer first. Lines emitted by the dispatched tasks are
    /// recorded and also passed on to `forward` when given. Returns how many
    /// tasks were dispatched.
    pub fn run_tasks(&self, forward: Option<SharedSink>) -> Result<usize, SchedulerError> {
        self.logs.clear();
        let sink: SharedSink = Arc::new(self.logs.forwarding_to(forward));
        let dispatched = self.scheduler.dispatch_all(sink)?;
        Ok(dispatched.len())
    }

    /// Wait for the dispatched tasks, at most `timeout`
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> WaitSummary {
        self.scheduler.await_completion(timeout)
    }

    /// Log lines recorded since the last run
    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logs.lines()
    }

    /// Final scoreboard for everything dispatched so far
    #[must_use]
    pub fn report(&self) -> Scoreboard {
        self.scheduler.report()
    }

    /// Shut the scheduler down
    pub fn stop(&self) {
        self.scheduler.shutdown();
    }
}

impl std::fmt::Debug for TargetWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetWorker")
            .field("scheduler", &self.scheduler)
            .field("targets", &self.targets)
            .field("logs", &self.logs)
            .finish_non_exhaustive()
    }
}
