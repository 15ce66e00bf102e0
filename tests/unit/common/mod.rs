//! Shared test fixtures and helpers
//!
//! Fake tasks with scripted outcomes and a throwaway local HTTP server.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sentinel::models::Priority;
use sentinel::scheduler::{Scheduler, SchedulerOptions};
use sentinel::task::{SharedSink, Task, TaskError};

/// What a fake task does when executed
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail,
    Fault,
    Panic,
}

/// Records which tasks started, in order, and how often each ran
#[derive(Debug, Clone, Default)]
pub struct Journal {
    started: Arc<Mutex<Vec<String>>>,
    runs: Arc<Mutex<HashMap<String, usize>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &str) {
        self.started.lock().unwrap().push(name.to_string());
        *self.runs.lock().unwrap().entry(name.to_string()).or_default() += 1;
    }

    /// Names in the order their execution started
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    /// How many times each name was executed
    pub fn runs(&self) -> HashMap<String, usize> {
        self.runs.lock().unwrap().clone()
    }
}

/// A task with a scripted outcome and optional delay
pub struct FakeTask {
    priority: Priority,
    name: String,
    delay: Duration,
    block: Duration,
    behavior: Behavior,
    journal: Option<Journal>,
    sink: Option<SharedSink>,
}

impl FakeTask {
    pub fn new(priority: Priority, name: &str) -> Self {
        Self {
            priority,
            name: name.to_string(),
            delay: Duration::ZERO,
            block: Duration::ZERO,
            behavior: Behavior::Succeed,
            journal: None,
            sink: None,
        }
    }

    pub fn behaving(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hold the executing thread for `block` instead of yielding
    pub fn blocking(mut self, block: Duration) -> Self {
        self.block = block;
        self
    }

    pub fn journaled(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub fn boxed(self) -> Box<dyn Task> {
        Box::new(self)
    }
}

#[async_trait]
impl Task for FakeTask {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn identifier(&self) -> &str {
        &self.name
    }

    fn attach_log_sink(&mut self, sink: SharedSink) {
        self.sink = Some(sink);
    }

    async fn execute(&self) -> Result<bool, TaskError> {
        if let Some(journal) = &self.journal {
            journal.record(&self.name);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if !self.block.is_zero() {
            std::thread::sleep(self.block);
        }
        if let Some(sink) = &self.sink {
            sink.emit(&format!("[fake] {}", self.name));
        }
        match self.behavior {
            Behavior::Succeed => Ok(true),
            Behavior::Fail => Ok(false),
            Behavior::Fault => Err(TaskError::Fault(format!("{} blew up", self.name))),
            Behavior::Panic => panic!("{} panicked", self.name),
        }
    }
}

/// Scheduler with a small pool and a short grace period
pub fn scheduler(workers: usize) -> Arc<Scheduler> {
    let options = SchedulerOptions {
        workers,
        shutdown_grace: Duration::from_secs(5),
    };
    Arc::new(Scheduler::new(options).expect("failed to start scheduler"))
}

/// Sink that drops every line
pub fn null_sink() -> SharedSink {
    Arc::new(|_: &str| {})
}

/// Start a local HTTP server answering every request with `status`
///
/// Returns its base URL. The server thread lives until the test exits.
pub fn serve(status: u16) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("failed to bind test server");
    let port = server.server_addr().to_ip().expect("test server has no IP address").port();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let _ = request.respond(tiny_http::Response::empty(tiny_http::StatusCode(status)));
        }
    });
    format!("http://127.0.0.1:{port}/")
}

/// A URL on a local port nothing listens on
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
