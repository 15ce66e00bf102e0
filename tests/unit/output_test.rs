//! Tests for output formatting

use sentinel::output::{OutputMode, ScanResult, paint_line};
use sentinel::scheduler::{Scoreboard, WaitSummary};

fn sample() -> ScanResult {
    ScanResult {
        started_at: "2026-01-01T00:00:00+00:00".to_string(),
        finished_at: "2026-01-01T00:00:03+00:00".to_string(),
        wait: WaitSummary {
            success: 1,
            failed: 1,
            timed_out: false,
        },
        scoreboard: Scoreboard {
            success: 1,
            failed: 1,
        },
        logs: vec!["[200] https://a.example".to_string()],
    }
}

#[test]
fn test_output_mode_default() {
    assert_eq!(OutputMode::default(), OutputMode::Human);
}

#[test]
fn test_scan_result_json_shape() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json["wait"]["timed_out"], false);
    assert_eq!(json["scoreboard"]["success"], 1);
    assert_eq!(json["scoreboard"]["failed"], 1);
    assert_eq!(json["logs"][0], "[200] https://a.example");
}

#[test]
fn test_paint_line_keeps_text() {
    colored::control::set_override(false);
    assert_eq!(paint_line("[ERROR] x - timed out"), "[ERROR] x - timed out");
    assert_eq!(paint_line("[200] x"), "[200] x");
}
