//! Harness error types.
//!
//! This module provides the [`HarnessError`] type, the single error a probe
//! run can end with. Every variant is fatal; the run produces no partial
//! report.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can abort a probe run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// Installing the watch or receiving from it failed, or the backend
    /// delivered an event outside the known vocabulary.
    #[error("watcher error: {0}")]
    Watch(#[from] fp_watcher::WatchError),

    /// A fixture operation failed during setup or while acting.
    #[error("action error: {0}")]
    Action(#[from] fp_actions::ActionError),

    /// Preparing the scratch tree failed.
    #[error("failed to prepare scratch directory {path}: {source}")]
    Scratch {
        /// Directory being removed or created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path on the way to the scratch tree is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),

    /// The action driver went away without signalling completion.
    #[error("action driver exited without signalling completion")]
    DriverLost,

    /// The action driver panicked.
    #[error("action driver panicked: {0}")]
    DriverPanicked(String),
}

impl HarnessError {
    /// Creates a new [`HarnessError::Scratch`] error.
    #[must_use]
    pub fn scratch(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Scratch {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the backend delivered an uninterpretable event.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Watch(err) if err.is_protocol_violation())
    }
}
