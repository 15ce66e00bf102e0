//! Target priority levels
//!
//! Ranks check targets. The weight is used purely for ordering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Priority of a check target, in ascending severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Routine target
    #[default]
    Info,
    /// Target worth watching
    Warning,
    /// Target that must be checked first
    Critical,
}

/// Error returned when a priority token is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid priority: {token}. Use: INFO, WARNING, CRITICAL")]
pub struct ParsePriorityError {
    /// The token that failed to parse
    pub token: String,
}

impl Priority {
    /// All levels, lowest first
    pub const ALL: [Self; 3] = [Self::Info, Self::Warning, Self::Critical];

    /// Ordering weight (1 to 3)
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Warning => 2,
            Self::Critical => 3,
        }
    }

    /// Upper-case name used in target files and session files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ParsePriorityError {
                token: s.to_string(),
            }),
        }
    }
}
