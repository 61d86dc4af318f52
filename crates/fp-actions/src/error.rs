//! Error types for the fp-actions crate.
//!
//! This module provides the [`ActionError`] type for failures while
//! preparing or performing scripted filesystem operations.

use std::fmt;

use camino::Utf8PathBuf;

/// Raw filesystem primitive that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    /// Creating or truncating a file.
    Create,
    /// Writing bytes to an open file.
    Write,
    /// Syncing and closing a written file.
    Close,
    /// Removing a file.
    Remove,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Close => "close",
            Self::Remove => "remove",
        })
    }
}

/// Errors that can occur while running actions.
///
/// All of them abort the run: the actions are test fixtures, and a failed
/// fixture leaves nothing meaningful to report. There are no retries.
///
/// # Examples
///
/// ```
/// use fp_actions::{ActionError, FsOp};
/// use std::io;
///
/// let err = ActionError::io(
///     FsOp::Create,
///     "/scratch/source/1byte",
///     io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
/// );
/// assert_eq!(err.path().map(|p| p.as_str()), Some("/scratch/source/1byte"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A create, write, close or remove failed.
    #[error("failed to {op} {path}: {source}")]
    Io {
        /// Primitive that failed.
        op: FsOp,
        /// Path it was applied to.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rename failed.
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        /// Source path.
        from: Utf8PathBuf,
        /// Target path.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An action that needs its setup step ran without it.
    #[error("action '{name}' ran before its setup")]
    MissingSource {
        /// Name of the action.
        name: &'static str,
    },

    /// The watched root has no parent to move files to or from.
    #[error("watched root has no parent directory: {0}")]
    RootHasNoParent(Utf8PathBuf),

    /// Two actions in one registry share a name.
    #[error("duplicate action name: {0}")]
    DuplicateName(&'static str),
}

impl ActionError {
    /// Creates a new [`ActionError::Io`] error.
    #[inline]
    pub fn io(op: FsOp, path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ActionError::Rename`] error.
    #[inline]
    pub fn rename(
        from: impl Into<Utf8PathBuf>,
        to: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Returns the path the failing operation was applied to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Io { path, .. } | Self::RootHasNoParent(path) => Some(path),
            Self::Rename { from, .. } => Some(from),
            Self::MissingSource { .. } | Self::DuplicateName(_) => None,
        }
    }
}
