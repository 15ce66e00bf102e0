//! HTTP liveness check
//!
//! Sends a body-less HEAD request to the target. Any response counts as online,
//! whatever its status code; only transport failures count as offline.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::redirect::Policy;

use super::{SharedSink, Task, TaskError};
use crate::models::Priority;

/// User agent sent with every probe unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Sentinel/1.0)";

/// How probes talk to the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Per-request timeout
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
        }
    }
}

impl ProbeSettings {
    /// Build the HTTP client shared by all check tasks
    ///
    /// Probes always go direct; proxy environment variables are ignored.
    pub fn build_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .no_proxy()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(Policy::limited(self.max_redirects))
            .build()
    }
}

/// Checks that a URL answers a HEAD request
pub struct CheckTask {
    priority: Priority,
    url: String,
    client: Client,
    sink: Option<SharedSink>,
}

impl CheckTask {
    /// Create a check using an existing client
    #[must_use]
    pub const fn new(priority: Priority, url: String, client: Client) -> Self {
        Self {
            priority,
            url,
            client,
            sink: None,
        }
    }

    fn log(&self, line: &str) {
        if let Some(sink) = &self.sink {
            sink.emit(line);
        }
    }
}

impl std::fmt::Debug for CheckTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckTask")
            .field("priority", &self.priority)
            .field("url", &self.url)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for CheckTask {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn identifier(&self) -> &str {
        &self.url
    }

    fn attach_log_sink(&mut self, sink: SharedSink) {
        self.sink = Some(sink);
    }

    async fn execute(&self) -> Result<bool, TaskError> {
        debug!("probing {} ({})", self.url, self.priority);
        match self.client.head(self.url.as_str()).send().await {
            Ok(response) => {
                self.log(&format!("[{}] {}", response.status().as_u16(), self.url));
                Ok(true)
            },
            Err(err) => {
                debug!("probe of {} failed: {err}", self.url);
                self.log(&format!("[ERROR] {} - {}", self.url, describe(&err)));
                Ok(false)
            },
        }
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "timed out".to_string()
    } else if err.is_builder() {
        "invalid target".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else if err.is_redirect() {
        "too many redirects".to_string()
    } else {
        err.to_string()
    }
}
