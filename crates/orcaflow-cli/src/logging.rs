use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use orcaflow_core::TOOL_NAME;

pub fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `orcaflow_<run_id>_<YYYYmmdd_HHMMSS>.log`
pub fn log_file_name(run_id: &str, started: DateTime<Local>) -> String {
    format!(
        "{TOOL_NAME}_{run_id}_{}.log",
        started.format("%Y%m%d_%H%M%S")
    )
}

/// Install the global subscriber: console on stdout at the requested level,
/// plus a DEBUG-level run log inside `log_dir`. Returns the log file path.
pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_dir: &Path,
    run_id: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let path = log_dir.join(log_file_name(run_id, Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .compact()
        .with_filter(console_level(verbosity, quiet));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(path)
}
