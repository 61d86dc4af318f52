//! Error types for the fp-watcher crate.
//!
//! This module provides the [`WatchError`] type for errors that can occur
//! while installing a watch or decoding its notifications.

use camino::Utf8PathBuf;

/// Errors that can occur during watching.
///
/// Every variant is fatal for a probe run: the harness characterizes the
/// exact event stream, so a lost or undecodable notification invalidates it.
///
/// - **Notify errors** ([`WatchError::Notify`]): watch installation failed or
///   the backend reported an error mid-stream
/// - **Path not found** ([`WatchError::PathNotFound`]): path must exist
/// - **Channel closed** ([`WatchError::ChannelClosed`]): communication broken
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): basename cannot be keyed
/// - **Unrecognized event** ([`WatchError::UnrecognizedEvent`]): protocol violation
/// - **I/O errors** ([`WatchError::Io`]): path canonicalization failed
///
/// # Examples
///
/// ```
/// use fp_watcher::WatchError;
///
/// fn describe(err: &WatchError) -> &'static str {
///     match err {
///         WatchError::Notify(_) => "backend",
///         WatchError::PathNotFound(_) => "missing path",
///         WatchError::ChannelClosed => "channel",
///         WatchError::NonUtf8Path(_) => "encoding",
///         WatchError::UnrecognizedEvent { .. } => "protocol",
///         WatchError::Io(_) => "io",
///     }
/// }
///
/// assert_eq!(describe(&WatchError::ChannelClosed), "channel");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The notify backend failed to install the watch or reported an error.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The specified path does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// The event channel or the watcher task went away unexpectedly.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// A notification carried a path that is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// A notification kind outside the Write/Create/Delete/Rename vocabulary.
    #[error("unrecognized event kind {kind} for {}", path.as_ref().map_or("<no path>", |p| p.as_str()))]
    UnrecognizedEvent {
        /// Debug rendering of the backend's event kind.
        kind: String,
        /// First path the event referred to, if any.
        path: Option<Utf8PathBuf>,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Creates a new [`WatchError::NonUtf8Path`] error.
    #[inline]
    pub fn non_utf8_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::NonUtf8Path(path.into())
    }

    /// Creates a new [`WatchError::UnrecognizedEvent`] error.
    #[inline]
    pub fn unrecognized(kind: &notify::EventKind, path: Option<Utf8PathBuf>) -> Self {
        Self::UnrecognizedEvent {
            kind: format!("{kind:?}"),
            path,
        }
    }

    /// Returns `true` if the backend delivered something outside the known vocabulary.
    #[inline]
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::UnrecognizedEvent { .. })
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) => Some(path),
            Self::UnrecognizedEvent { path, .. } => path.as_ref(),
            Self::Notify(_) | Self::ChannelClosed | Self::NonUtf8Path(_) | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_watch_error_path_not_found() {
        let err = WatchError::path_not_found("scratch/missing");
        assert!(!err.is_protocol_violation());
        assert_eq!(err.path().map(|p| p.as_str()), Some("scratch/missing"));
        assert_eq!(err.to_string(), "path does not exist: scratch/missing");
    }

    #[test]
    fn test_watch_error_channel_closed() {
        let err = WatchError::ChannelClosed;
        assert!(err.path().is_none());
        assert!(err.to_string().contains("channel closed"));
    }

    #[test]
    fn test_watch_error_non_utf8() {
        let err = WatchError::non_utf8_path(PathBuf::from("test"));
        assert!(err.path().is_none());
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_watch_error_unrecognized() {
        let err = WatchError::unrecognized(
            &notify::EventKind::Other,
            Some(Utf8PathBuf::from("/scratch/source/1M")),
        );
        assert!(err.is_protocol_violation());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/scratch/source/1M"));
        let msg = err.to_string();
        assert!(msg.contains("Other"));
        assert!(msg.contains("/scratch/source/1M"));
    }

    #[test]
    fn test_watch_error_unrecognized_without_path() {
        let err = WatchError::unrecognized(&notify::EventKind::Any, None);
        assert!(err.to_string().contains("<no path>"));
    }

    #[test]
    fn test_watch_error_io() {
        let err = WatchError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        assert!(err.path().is_none());
        assert!(err.to_string().contains("I/O error"));
    }
}
