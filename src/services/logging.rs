//! Diagnostics setup.
//!
//! The terminal belongs to the TUI, so tracing output goes to a log file only.
//! `ML_TUI_LOG` takes an `EnvFilter` directive (default `info`).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

pub const LOG_FILE_NAME: &str = "ml-session-tui.log";
const LOG_ENV: &str = "ML_TUI_LOG";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber writing to `<dir>/ml-session-tui.log`.
///
/// Subsequent calls are no-ops. Callers may ignore the error and run without logs.
pub fn init(dir: &Path) -> Result<PathBuf, LoggingError> {
    let log_path = dir.join(LOG_FILE_NAME);
    if LOG_GUARD.get().is_some() {
        return Ok(log_path);
    }
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_ansi(false).with_writer(writer);
    let subscriber = Registry::default().with(env_filter()).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("logging initialized; log file at {}", log_path.display());
    Ok(log_path)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// `ML_TUI_LOG_DIR`, else `<config dir>/logs`.
pub fn log_dir(config_dir: Option<&Path>) -> PathBuf {
    if let Ok(dir) = std::env::var("ML_TUI_LOG_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    match config_dir {
        Some(d) => d.join("logs"),
        None => std::env::temp_dir().join("ml-session-tui"),
    }
}
