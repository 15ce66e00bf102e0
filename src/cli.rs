//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use sentinel::config::SentinelConfig;
use sentinel::output::OutputMode;

/// sentinel - Priority-ordered availability checks for URL lists
#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    version,
    about = "Priority-ordered availability checks for URL lists",
    long_about = "Check whether a list of URLs answers HTTP HEAD requests.\n\n\
                  Targets are tagged INFO, WARNING or CRITICAL and checked\n\
                  most critical first on a bounded worker pool."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to ~/.config/sentinel/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check every target in a target list or session file
    Scan {
        /// `LEVEL=url` target list, or a `.json` session file
        input: PathBuf,

        /// Seconds to wait before cancelling unfinished checks
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Also stage the loaded targets to this session file
        #[arg(long)]
        stage: Option<PathBuf>,
    },

    /// Convert a target list into a session file
    Stage {
        /// `LEVEL=url` target list
        input: PathBuf,

        /// Session file to write
        #[arg(short, long, default_value = "session.json")]
        session: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file instead
        #[arg(long)]
        init: bool,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Scan {
            input,
            timeout,
            stage,
        }) => {
            let config = SentinelConfig::load(cli.config.as_deref())?;
            commands::scan(&config, &input, timeout, stage.as_deref(), output_mode)
        },
        Some(Command::Stage { input, session }) => commands::stage(&input, &session, output_mode),
        Some(Command::Config { init }) => commands::config(cli.config.as_deref(), init, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("sentinel v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("sentinel v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'sentinel --help' for usage");
                println!("Run 'sentinel scan <targets-file>' to check a target list");
            }
            Ok(())
        },
    }
}
