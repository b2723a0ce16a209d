//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "TRADFILE_LOG";

const DEFAULT_FILTER: &str = "tradfile=info,tradfile_app=info,warn";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/tradfile/logs/` because stdout carries
/// the headless event stream. Log level is controlled by `TRADFILE_LOG`.
///
/// # Examples
/// ```bash
/// TRADFILE_LOG=debug cargo run
/// TRADFILE_LOG=tradfile_app=trace cargo run
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir).map_err(|e| {
        Error::startup(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "tradfile.log");

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::startup(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("tradfile starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("tradfile").join("logs")
}
