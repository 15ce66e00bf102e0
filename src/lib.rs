//! sentinel - A CLI tool that checks the availability of prioritized URL lists
//!
//! This library provides the priority-ordered task scheduler, the HTTP check
//! task, target loading, and the worker that ties them into scan cycles.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod loader;
pub mod models;
pub mod output;
pub mod scheduler;
pub mod task;
pub mod worker;
