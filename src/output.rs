//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::scheduler::{Scoreboard, WaitSummary};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a scan cycle
#[derive(Debug, Serialize)]
pub struct ScanResult {
    /// When the scan started (RFC3339)
    pub started_at: String,
    /// When the scan finished (RFC3339)
    pub finished_at: String,
    /// Outcome of the timeout-bound wait
    pub wait: WaitSummary,
    /// Final accounting
    pub scoreboard: Scoreboard,
    /// Every log line the scan produced
    pub logs: Vec<String>,
}

/// Result of staging a target list
#[derive(Debug, Serialize)]
pub struct StageResult {
    /// Session file written
    pub session: String,
    /// Number of targets staged
    pub targets: usize,
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

/// Colorize a probe log line for a terminal
#[must_use]
pub fn paint_line(line: &str) -> String {
    if line.starts_with("[ERROR]") {
        line.red().to_string()
    } else if line.starts_with("[2") || line.starts_with("[3") {
        line.green().to_string()
    } else {
        line.yellow().to_string()
    }
}

impl ScanResult {
    /// Render the result based on output mode
    ///
    /// Log lines are not repeated in human mode; they were printed live.
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        println!();
        println!("=== SCAN FINISHED ===");
        println!("{}", self.wait);
        println!();
        println!("{}", self.scoreboard);
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

impl StageResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("Staged {} target(s) to {}", self.targets, self.session);
            },
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}
