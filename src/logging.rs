//! Process-wide logging
//!
//! [`init`] runs once at startup and installs two layers: an append-only file
//! log and a console log on stderr. The returned [`LogGuard`] must be held for
//! the life of the process; dropping it flushes the file writer.

use crate::config::{ConfigError, ConfigResult, LogSettings};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the file writer alive and remembers where it writes
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    path: PathBuf,
    _worker: WorkerGuard,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append-mode writer for `path`, creating its directory if needed
pub fn file_writer(path: &Path) -> ConfigResult<RollingFileAppender> {
    let log_error = |reason: String| ConfigError::LogFile {
        path: path.to_path_buf(),
        reason,
    };

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| log_error("path has no file name".to_string()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&dir)
        .map_err(|e| log_error(e.to_string()))
}

/// Install the global subscriber
pub fn init(settings: &LogSettings) -> ConfigResult<LogGuard> {
    let file_level = settings.file_filter()?;
    let console_level = settings.console_filter()?;

    let (writer, worker) = tracing_appender::non_blocking(file_writer(&settings.path)?);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(file_level);

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(console_level.into()));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| ConfigError::LogFile {
            path: settings.path.clone(),
            reason: e.to_string(),
        })?;

    tracing::debug!(path = %settings.path.display(), "Logging initialised");

    Ok(LogGuard {
        path: settings.path.clone(),
        _worker: worker,
    })
}
