//! Logging initialization.
//!
//! With `logging.to_file` logs go to `<logging.dir>/agency-api-{datetime}.log`,
//! otherwise to stderr. `RUST_LOG` takes precedence over the configured level.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Flushes buffered file output when dropped; keep alive until exit
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file, when logging to a file
    pub log_file_path: Option<PathBuf>,
}

/// Effective filter directive: `debug` when forced, else the configured level
pub fn filter_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// `agency-api-<UTC timestamp>.log`
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("agency-api-{}.log", timestamp)
}

/// Install the global subscriber. Call once per process.
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let level = filter_directive(config, debug_override);
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(level));

    if config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)?;

        let log_filename = log_file_name();
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .try_init()?;

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
