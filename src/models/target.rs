//! Target records and target sets
//!
//! A [`TargetSet`] is the priority → identifiers mapping handed to the worker.
//! Identifiers are opaque here; the check task treats them as URLs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Priority;

/// A single check target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Priority of the target
    pub priority: Priority,
    /// Target identifier (usually a URL)
    pub identifier: String,
}

impl Target {
    /// Create a new target
    #[must_use]
    pub fn new(priority: Priority, identifier: impl Into<String>) -> Self {
        Self {
            priority,
            identifier: identifier.into(),
        }
    }
}

/// Targets grouped by priority
///
/// Per-priority insertion order and duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    entries: BTreeMap<Priority, Vec<String>>,
}

impl TargetSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier under a priority
    pub fn add(&mut self, priority: Priority, identifier: impl Into<String>) {
        self.entries.entry(priority).or_default().push(identifier.into());
    }

    /// Add a target record
    pub fn push(&mut self, target: Target) {
        self.add(target.priority, target.identifier);
    }

    /// Identifiers registered under a priority
    #[must_use]
    pub fn get(&self, priority: Priority) -> &[String] {
        self.entries.get(&priority).map_or(&[], Vec::as_slice)
    }

    /// Total number of targets across all priorities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the set holds no targets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate as target records, highest priority first
    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        self.entries.iter().rev().flat_map(|(priority, identifiers)| {
            identifiers.iter().map(|id| Target::new(*priority, id.clone()))
        })
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut set = Self::new();
        for target in iter {
            set.push(target);
        }
        set
    }
}
