//! Logging configuration using tracing
//!
//! The explorer never logs to stdout/stderr: headless output is NDJSON on
//! stdout, so diagnostics go to a daily rolling file instead.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "GX_LOG";

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "GX_LOG_DIR";

const LOG_FILE_PREFIX: &str = "gx.log";
const DEFAULT_FILTER: &str = "graph_explorer=info,gx_app=info,gx_core=info,warn";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/graph-explorer/logs/` unless
/// `GX_LOG_DIR` points elsewhere. Log level is controlled by `GX_LOG`.
/// Returns the directory the log files land in.
///
/// # Examples
/// ```bash
/// GX_LOG=debug gx model.json dump
/// GX_LOG=gx_app=trace gx model.json find Reference
/// ```
pub fn init() -> Result<PathBuf> {
    let log_dir = resolve_log_directory(std::env::var_os(LOG_DIR_ENV).map(PathBuf::from));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let env_filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("Graph Explorer starting, logging to {}", log_dir.display());

    Ok(log_dir)
}

/// Pick the log directory: an explicit override wins, otherwise the
/// platform's local data directory.
pub fn resolve_log_directory(override_dir: Option<PathBuf>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("graph-explorer")
            .join("logs"),
    }
}
