//! Target loading
//!
//! Two input formats:
//!
//! - **Target lists**: one `LEVEL=url` entry per line. Blank lines and lines
//!   starting with `#` are ignored.
//! - **Session files**: the staged form of a target list, a JSON array of
//!   `{"level": "...", "url": "..."}` objects.
//!
//! Bad entries are logged and skipped; they never abort a load.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ParsePriorityError, Priority, Target, TargetSet};

/// Errors produced while loading targets
#[derive(Debug, Error)]
pub enum LoadError {
    /// A line has no `=` between level and target
    #[error("missing '=' between level and target: {line}")]
    MissingSeparator {
        /// The offending line
        line: String,
    },

    /// A line names a level but no target
    #[error("empty target for level {level}")]
    EmptyTarget {
        /// The level that was given
        level: String,
    },

    /// The level is not one of the known priorities
    #[error(transparent)]
    Priority(#[from] ParsePriorityError),

    /// Reading or writing a file failed
    #[error("failed to access {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A session file is not valid JSON
    #[error("invalid session file: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry of a session file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEntry {
    /// Priority name as written by the operator
    pub level: String,
    /// Target URL
    pub url: String,
}

/// Prefix bare host names with `https://`
#[must_use]
pub fn normalize_target(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Parse a single `LEVEL=url` line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Target>, LoadError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (level, value) = line.split_once('=').ok_or_else(|| LoadError::MissingSeparator {
        line: line.to_string(),
    })?;
    let (level, value) = (level.trim(), value.trim());
    if value.is_empty() {
        return Err(LoadError::EmptyTarget {
            level: level.to_string(),
        });
    }

    let priority: Priority = level.parse()?;
    Ok(Some(Target::new(priority, normalize_target(value))))
}

/// Parse a whole target list, skipping bad lines with a warning
#[must_use]
pub fn parse_targets(text: &str) -> TargetSet {
    let mut set = TargetSet::new();
    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(target)) => set.push(target),
            Ok(None) => {},
            Err(err) => warn!("line {}: {err}, skipping", index + 1),
        }
    }
    set
}

/// Read and parse a target list file
pub fn read_targets(path: &Path) -> Result<TargetSet, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = parse_targets(&text);
    info!("loaded {} target(s) from {}", set.len(), path.display());
    Ok(set)
}

/// Write a target set as a session file
pub fn save_session(path: &Path, targets: &TargetSet) -> Result<(), LoadError> {
    let entries: Vec<StagedEntry> = targets
        .iter()
        .map(|target| StagedEntry {
            level: target.priority.to_string(),
            url: target.identifier,
        })
        .collect();
    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(path, json).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("staged {} target(s) to {}", entries.len(), path.display());
    Ok(())
}

/// Read a session file, skipping entries with unknown levels
pub fn load_session(path: &Path) -> Result<TargetSet, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<StagedEntry> = serde_json::from_str(&text)?;

    let mut set = TargetSet::new();
    for entry in entries {
        match entry.level.parse::<Priority>() {
            Ok(priority) => set.add(priority, entry.url),
            Err(err) => warn!("{}: {err}, skipping {}", path.display(), entry.url),
        }
    }
    info!("loaded {} target(s) from {}", set.len(), path.display());
    Ok(set)
}

/// Load targets from either format, picking by the `.json` extension
pub fn load_any(path: &Path) -> Result<TargetSet, LoadError> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        load_session(path)
    } else {
        read_targets(path)
    }
}
