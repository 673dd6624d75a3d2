//! Logging and tracing configuration
//!
//! Logs go to stderr so they never interleave with the scenario trace on
//! stdout. An optional log file captures the same events without ANSI
//! colors.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Default log file name inside the log directory
const LOG_FILE_NAME: &str = "apicheck.log";

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable. Without it,
/// this crate logs at WARN, or DEBUG when `verbose` is set, and
/// dependencies log at WARN.
///
/// The returned guard must be held until exit so buffered file output is
/// flushed.
pub fn init_cli(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("apicheck=debug,warn")
        } else {
            EnvFilter::new("apicheck=warn,warn")
        }
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let file_writer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Warning: Could not open log file '{}': {}", path.display(), e);
            None
        }
    });

    match file_writer {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();

            None
        }
    }
}

/// Get the default log file path
pub fn default_log_path() -> Option<PathBuf> {
    paths::log_dir().map(|d| d.join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}
