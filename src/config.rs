//! Configuration management
//!
//! Settings for the scheduler, scan cycle, and HTTP probe.
//! Config is stored at `~/.config/sentinel/config.toml` (XDG standard).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::scheduler::{DEFAULT_SHUTDOWN_GRACE, DEFAULT_WORKERS, SchedulerOptions};
use crate::task::{DEFAULT_USER_AGENT, ProbeSettings};

/// Sentinel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Worker pool settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Scan cycle settings
    #[serde(default)]
    pub scan: ScanConfig,
    /// HTTP probe settings
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Worker pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of pool workers
    pub workers: usize,
    /// Seconds `shutdown` lets in-flight work finish
    pub shutdown_grace_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE.as_secs(),
        }
    }
}

/// Scan cycle settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Seconds to wait for a scan before cancelling stragglers
    pub wait_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: 10,
        }
    }
}

/// HTTP probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
        }
    }
}

impl SentinelConfig {
    /// Default config file location, if the platform has a config dir
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sentinel").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is used when present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Save configuration, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scheduler options from the `[scheduler]` section
    #[must_use]
    pub const fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            workers: self.scheduler.workers,
            shutdown_grace: Duration::from_secs(self.scheduler.shutdown_grace_secs),
        }
    }

    /// Probe settings from the `[probe]` section
    #[must_use]
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_secs(self.probe.timeout_secs),
            user_agent: self.probe.user_agent.clone(),
            max_redirects: self.probe.max_redirects,
        }
    }

    /// Wait timeout from the `[scan]` section
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.scan.wait_timeout_secs)
    }
}
