//! Config command - show or initialize the configuration file

use std::path::Path;

use anyhow::Context;
use sentinel::config::SentinelConfig;
use sentinel::output::{OperationResult, OutputMode};

/// Print the effective configuration, or write the default one
pub fn config(path: Option<&Path>, init: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    if init {
        let target = path
            .map(Path::to_path_buf)
            .or_else(SentinelConfig::default_path)
            .context("no config directory available; pass --config")?;
        if target.exists() {
            anyhow::bail!("{} already exists", target.display());
        }
        SentinelConfig::default().save(&target)?;
        OperationResult {
            success: true,
            message: format!("Created {}", target.display()),
        }
        .render(output_mode);
        return Ok(());
    }

    let config = SentinelConfig::load(path)?;
    if output_mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
