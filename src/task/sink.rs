//! Log sinks
//!
//! Tasks push human-readable lines through a [`LogSink`]. The front-end only
//! ever sees plain strings.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives one log line per call
pub trait LogSink: Send + Sync {
    /// Emit a single line
    fn emit(&self, line: &str);
}

/// Sink shared between the scheduler and every dispatched task
pub type SharedSink = Arc<dyn LogSink>;

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, line: &str) {
        self(line);
    }
}

/// Pushes lines into a channel read by another thread
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<String>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel
    #[must_use]
    pub const fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl LogSink for ChannelSink {
    fn emit(&self, line: &str) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.sender.send(line.to_string());
    }
}

/// Records every line and forwards it to an optional downstream sink
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
    forward: Option<SharedSink>,
}

impl RecordingSink {
    /// Create an empty recorder with no downstream sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder sharing this one's buffer but forwarding to `forward`
    #[must_use]
    pub fn forwarding_to(&self, forward: Option<SharedSink>) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
            forward,
        }
    }

    /// Copy of the recorded lines
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drop all recorded lines
    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl std::fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSink")
            .field("lines", &self.lines().len())
            .field("forwarding", &self.forward.is_some())
            .finish()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).push(line.to_string());
        if let Some(forward) = &self.forward {
            forward.emit(line);
        }
    }
}
