//! Log routing for the `redcrumbs` binary.
//!
//! The library only emits `tracing` events (connection wiring, adapter registration, crumb
//! class fallback). Binaries call [`init_tracing`] once to print them to stdout and append
//! them to a log file: `REDCRUMBS_LOG_FILE` when set, `logs/redcrumbs.log` otherwise.
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Variable naming the file that receives a copy of every log line.
pub const LOG_FILE_ENV: &str = "REDCRUMBS_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "logs/redcrumbs.log";
const DEFAULT_FILTER: &str = "info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the stdout and file subscribers.
///
/// `RUST_LOG` selects what is recorded (default `info`; `redcrumbs=debug` shows connection
/// and adapter wiring). Calling this twice, or after another subscriber was installed, is a
/// no-op.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let path = log_file_path(std::env::var(LOG_FILE_ENV).ok());
    let result = match open_log_writer(&path) {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
            .try_init(),
        None => registry.try_init(),
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "Tracing subscriber already installed");
    }
}

/// File the log copy goes to: the configured path, or `logs/redcrumbs.log` when it is unset
/// or blank.
pub fn log_file_path(configured: Option<String>) -> PathBuf {
    configured
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from)
}

// Stdout logging continues when the file cannot be opened.
fn open_log_writer(path: &Path) -> Option<NonBlocking> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty())
        && let Err(err) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create log directory {}: {err}", parent.display());
        return None;
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(writer)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}
