//! Logging context for a harness run.
//!
//! A [`LogSession`] owns a `tracing` dispatcher writing every event to two
//! sinks, the console and an append-only log file, both in
//! `timestamp - LEVEL - message` form. Nothing is installed globally: code
//! logs into the session only inside [`LogSession::in_scope`].

mod format;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use divcheck_application::config::LOG_FILE_NAME;
use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::fmt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

pub use format::{LineFormat, TIMESTAMP_FORMAT};

/// Errors setting up or closing the log sinks.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The log file could not be opened for appending.
    #[error("cannot open log file {path}: {source}")]
    OpenFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Buffered log lines could not be written out.
    #[error("cannot flush log file {path}: {source}")]
    Flush {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Standard output could not be flushed.
    #[error("cannot flush console output: {source}")]
    FlushConsole {
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Console and file sinks for one run.
///
/// Create it at process start, run the harness inside [`LogSession::in_scope`],
/// and close it with [`LogSession::finish`].
pub struct LogSession {
    dispatch: Dispatch,
    file: Arc<File>,
    path: PathBuf,
    console: bool,
    finished: bool,
}

impl LogSession {
    /// Opens a session logging to stdout and to `test_results.log` in `log_dir`.
    ///
    /// The directory is created if absent; an existing log file is appended to.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn open(log_dir: &Path) -> Result<Self, LoggingError> {
        Self::build(log_dir, true)
    }

    /// Opens a session logging to the file only.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn file_only(log_dir: &Path) -> Result<Self, LoggingError> {
        Self::build(log_dir, false)
    }

    fn build(log_dir: &Path, console: bool) -> Result<Self, LoggingError> {
        fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let path = log_dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::OpenFile {
                path: path.clone(),
                source,
            })?;
        let file = Arc::new(file);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let console_layer = console.then(|| {
            fmt::layer()
                .event_format(LineFormat)
                .with_writer(io::stdout)
        });
        let file_layer = fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(Arc::clone(&file));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            file,
            path,
            console,
            finished: false,
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` with this session as the active logger.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Flushes both sinks and closes the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be synced to disk or stdout
    /// cannot be flushed.
    pub fn finish(mut self) -> Result<(), LoggingError> {
        self.finished = true;
        self.flush()
    }

    fn flush(&self) -> Result<(), LoggingError> {
        let to_err = |source| LoggingError::Flush {
            path: self.path.clone(),
            source,
        };
        (&*self.file).flush().map_err(to_err)?;
        self.file.sync_all().map_err(to_err)?;
        if self.console {
            io::stdout()
                .flush()
                .map_err(|source| LoggingError::FlushConsole { source })?;
        }
        Ok(())
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.flush();
        }
    }
}
