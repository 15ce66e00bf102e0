//! Domain models for sentinel
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Priority`] - How urgently a target should be checked
//! - [`Target`] - A prioritized identifier
//! - [`TargetSet`] - Targets grouped by priority

mod priority;
mod target;

pub use priority::{ParsePriorityError, Priority};
pub use target::{Target, TargetSet};
