//! Tallies over completion handles

use serde::Serialize;

use super::handle::TaskState;

/// Outcome of a timeout-bound wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WaitSummary {
    /// Tasks that finished with a `true` outcome
    pub success: usize,
    /// Tasks that failed, faulted, or were cancelled
    pub failed: usize,
    /// Whether the deadline fired before every task settled
    pub timed_out: bool,
}

impl WaitSummary {
    /// Number of tasks the wait covered
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.failed
    }

    /// Whether there was nothing to wait for
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl std::fmt::Display for WaitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No tasks to wait for.");
        }
        write!(
            f,
            "Result: {} Success, {} Failed (Timeout was: {})",
            self.success, self.failed, self.timed_out
        )
    }
}

/// Final success/failure accounting of a scan cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    /// Targets that answered
    pub success: usize,
    /// Targets that did not answer, faulted, or were cancelled
    pub failed: usize,
}

impl Scoreboard {
    /// Build a scoreboard from settled states
    #[must_use]
    pub fn tally(states: impl IntoIterator<Item = TaskState>) -> Self {
        let mut board = Self::default();
        for state in states {
            board.record(state);
        }
        board
    }

    /// Count one settled state
    pub const fn record(&mut self, state: TaskState) {
        if state.is_success() {
            self.success += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Total targets accounted for
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.failed
    }
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== FINAL SCOREBOARD ===")?;
        writeln!(f, "Total Targets: {}", self.total())?;
        writeln!(f, "Online: {}", self.success)?;
        writeln!(f, "Offline/Blocked: {}", self.failed)?;
        write!(f, "========================")
    }
}
