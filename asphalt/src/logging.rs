//! Logging infrastructure for Asphalt.
//!
//! Provides structured logging with file output and optional console output:
//! - Writes to `~/.asphalt/asphalt.log` by default (cleared on session start)
//! - Optionally mirrors to stdout for interactive commands
//! - Multi-line pretty format for readability
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{config_directory, DEFAULT_LOG_FILE_NAME};

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file,
/// and writes to it through a non-blocking appender. When `stdout_enabled`
/// is set, events are mirrored to the terminal.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// for this crate when `debug_mode` is set.
///
/// # Errors
///
/// Returns error if log directory cannot be created or log file cannot be cleared
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    debug_mode: bool,
) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .pretty();

    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_span_events(FmtSpan::CLOSE)
            .pretty()
            .boxed()
    });

    tracing_subscriber::registry()
        .with(default_filter(debug_mode))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn default_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("info,asphalt=debug,asphalt_cli=debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Create `log_dir` and truncate `log_dir/log_file`, returning its path.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// Get default log directory path.
pub fn default_log_dir() -> PathBuf {
    config_directory()
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    DEFAULT_LOG_FILE_NAME
}
