//! Logging configuration using tracing with file appender.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Log file used when none is configured.
pub const DEFAULT_LOG_FILE: &str = "tuicast.log";

/// Filter for the crate's own events. `RUST_LOG` wins when set.
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("tuicast={level}")))
        .unwrap_or_else(|_| EnvFilter::new("tuicast=info"))
}

/// Install the global subscriber, writing to the configured file.
///
/// Hold the returned guard for the life of the program: dropping it flushes
/// and stops the background writer. In debug builds span close events are
/// logged too, which times every broadcast pass and replay.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let log_path = config
        .file
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_LOG_FILE));
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE));

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false);

    #[cfg(debug_assertions)]
    let file_layer = file_layer.with_span_events(fmt::format::FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter_for(&config.level))
        .with(file_layer)
        .try_init()
        .wrap_err_with(|| format!("Failed to start logging to {}", log_path.display()))?;

    Ok(guard)
}
