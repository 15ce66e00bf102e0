//! Scan command - run one full check cycle over a target list

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sentinel::config::SentinelConfig;
use sentinel::loader;
use sentinel::output::{OperationResult, OutputMode, ScanResult, paint_line};
use sentinel::scheduler::Scheduler;
use sentinel::task::SharedSink;
use sentinel::worker::TargetWorker;

/// Load targets, check them all, and print the scoreboard
pub fn scan(
    config: &SentinelConfig,
    input: &Path,
    timeout: Option<u64>,
    stage: Option<&Path>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let targets = loader::load_any(input)?;
    if let Some(session) = stage {
        loader::save_session(session, &targets)?;
    }

    if targets.is_empty() {
        OperationResult {
            success: false,
            message: format!("No targets found in {}", input.display()),
        }
        .render(output_mode);
        return Ok(());
    }

    let scheduler = Arc::new(Scheduler::new(config.scheduler_options())?);
    let client = config.probe_settings().build_client()?;
    let mut worker = TargetWorker::with_probe(Arc::clone(&scheduler), client);
    worker.set_targets(targets);

    let started_at = chrono::Utc::now().to_rfc3339();
    let live: Option<SharedSink> = if output_mode == OutputMode::Human {
        println!("--- Starting Sentinel ---");
        Some(Arc::new(|line: &str| println!("{}", paint_line(line))))
    } else {
        None
    };

    worker.generate_tasks()?;
    worker.run_tasks(live)?;
    let wait = worker.wait(timeout.map_or_else(|| config.wait_timeout(), Duration::from_secs));
    let scoreboard = worker.report();
    let logs = worker.logs();
    worker.stop();

    ScanResult {
        started_at,
        finished_at: chrono::Utc::now().to_rfc3339(),
        wait,
        scoreboard,
        logs,
    }
    .render(output_mode);

    Ok(())
}
