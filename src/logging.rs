//! Tracing setup.
//!
//! Logs go to a file, never to the terminal the session is drawing on. `RUST_LOG` overrides
//! the default `info` filter.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

fn env_filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_directive).map_err(|source| LoggingError::Filter {
        directive: default_directive.to_string(),
        source,
    })
}

/// Registry with an env filter and a plain-text fmt layer writing to `log_file`.
pub fn build_subscriber(
    log_file: File,
    default_directive: &str,
) -> Result<impl tracing::Subscriber + Send + Sync, LoggingError> {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Arc::new(log_file));

    Ok(tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(default_directive)?))
}

/// Installs file logging as the global subscriber, appending to `path`.
pub fn init_file_logging(path: &Path) -> Result<(), LoggingError> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let subscriber = build_subscriber(log_file, DEFAULT_DIRECTIVE)?;
    tracing::subscriber::set_global_default(subscriber).map_err(|_| LoggingError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn subscriber_writes_to_the_log_file() {
        let log_file = NamedTempFile::new().expect("temp log");
        let subscriber =
            build_subscriber(log_file.reopen().expect("reopen"), "debug").expect("subscriber");

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(key = "terminal-history", "failed to persist terminal state");
        });

        let contents = std::fs::read_to_string(log_file.path()).expect("read log");
        assert!(contents.contains("WARN"));
        assert!(contents.contains("failed to persist terminal state"));
        assert!(contents.contains("terminal-history"));
    }

    #[test]
    fn open_failure_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no-such-dir").join("cyberterm.log");
        let err = init_file_logging(&missing).unwrap_err();
        assert!(matches!(err, LoggingError::Open { .. }));
        assert!(err.to_string().contains("cyberterm.log"));
    }
}
