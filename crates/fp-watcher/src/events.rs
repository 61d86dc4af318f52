//! Decoding of backend notifications into observed events.
//!
//! The `notify` backends report a rich [`notify::EventKind`] tree. The probe
//! only understands four kinds, so every backend event is classified:
//!
//! | Backend kind | Result |
//! |--------------|--------|
//! | `Create(_)` | [`EventKind::Create`] |
//! | `Remove(_)` | [`EventKind::Delete`] |
//! | `Modify(Data(_))`, `Modify(Any)` | [`EventKind::Write`] |
//! | `Modify(Name(From / To / Any / Other))` | [`EventKind::Rename`] |
//! | `Modify(Name(Both))` | skipped, summarizes the `From`/`To` pair already delivered |
//! | `Access(_)`, `Modify(Metadata(_))` | skipped, never part of the subscription |
//! | `Any`, `Other`, `Modify(Other)` | [`WatchError::UnrecognizedEvent`] |
//!
//! Each path of an accepted event becomes one [`ObservedEvent`], keyed by
//! the path's final component.

use camino::Utf8PathBuf;
use fp_core::EventKind;
use notify::event::{ModifyKind, RenameMode};
use smallvec::SmallVec;

use crate::error::WatchError;
use crate::mask::EventMask;

/// One `(basename, kind)` notification as seen by the consumer.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use fp_core::EventKind;
/// use fp_watcher::ObservedEvent;
///
/// let event = ObservedEvent::new(Utf8PathBuf::from("/scratch/source/1byte"), EventKind::Create);
/// assert_eq!(event.basename, "1byte");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEvent {
    /// Absolute path the backend reported.
    pub path: Utf8PathBuf,

    /// Final path component, the correlation key for the event log.
    pub basename: String,

    /// Decoded kind.
    pub kind: EventKind,
}

impl ObservedEvent {
    /// Creates an event, deriving the basename from `path`.
    ///
    /// A path without a final component (such as `/`) is keyed by the whole path.
    #[must_use]
    pub fn new(path: Utf8PathBuf, kind: EventKind) -> Self {
        let basename = path.file_name().unwrap_or(path.as_str()).to_owned();
        Self {
            path,
            basename,
            kind,
        }
    }
}

/// Events decoded from one backend notification. Usually one, two for renames
/// reported with both paths.
pub type DecodedEvents = SmallVec<[ObservedEvent; 2]>;

/// Maps a backend kind onto the probe vocabulary.
///
/// Returns `Ok(None)` for kinds the probe deliberately does not subscribe to
/// and an error for kinds it cannot interpret.
pub fn classify(kind: &notify::EventKind) -> Result<Option<EventKind>, WatchError> {
    use notify::EventKind as Backend;

    match kind {
        Backend::Create(_) => Ok(Some(EventKind::Create)),
        Backend::Remove(_) => Ok(Some(EventKind::Delete)),
        Backend::Modify(ModifyKind::Data(_) | ModifyKind::Any) => Ok(Some(EventKind::Write)),
        Backend::Modify(ModifyKind::Name(RenameMode::Both)) => Ok(None),
        Backend::Modify(ModifyKind::Name(_)) => Ok(Some(EventKind::Rename)),
        Backend::Access(_) | Backend::Modify(ModifyKind::Metadata(_)) => Ok(None),
        Backend::Any | Backend::Other | Backend::Modify(ModifyKind::Other) => {
            Err(WatchError::unrecognized(kind, None))
        }
    }
}

/// Decodes a backend notification, dropping kinds outside `mask`.
///
/// # Errors
///
/// Returns [`WatchError::UnrecognizedEvent`] for kinds outside the vocabulary
/// and [`WatchError::NonUtf8Path`] for paths that cannot be keyed.
pub fn decode(event: notify::Event, mask: EventMask) -> Result<DecodedEvents, WatchError> {
    let kind = match classify(&event.kind) {
        Ok(Some(kind)) => kind,
        Ok(None) => {
            tracing::trace!(kind = ?event.kind, paths = ?event.paths, "Skipping unsubscribed event");
            return Ok(DecodedEvents::new());
        }
        Err(_) => {
            let path = event
                .paths
                .into_iter()
                .next()
                .and_then(|p| Utf8PathBuf::try_from(p).ok());
            return Err(WatchError::unrecognized(&event.kind, path));
        }
    };

    if !mask.contains(kind) {
        tracing::trace!(%kind, paths = ?event.paths, "Event outside mask");
        return Ok(DecodedEvents::new());
    }

    event
        .paths
        .into_iter()
        .map(|path| {
            Utf8PathBuf::try_from(path)
                .map(|path| ObservedEvent::new(path, kind))
                .map_err(|e| WatchError::non_utf8_path(e.into_path_buf()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{
        AccessKind, AccessMode, CreateKind, DataChange, MetadataKind, RemoveKind,
    };
    use std::path::PathBuf;

    fn backend(kind: notify::EventKind, paths: &[&str]) -> notify::Event {
        paths
            .iter()
            .fold(notify::Event::new(kind), |event, p| event.add_path(PathBuf::from(p)))
    }

    #[test]
    fn test_classify_vocabulary() {
        use notify::EventKind as Backend;

        let cases = [
            (Backend::Create(CreateKind::File), EventKind::Create),
            (Backend::Remove(RemoveKind::File), EventKind::Delete),
            (
                Backend::Modify(ModifyKind::Data(DataChange::Content)),
                EventKind::Write,
            ),
            (Backend::Modify(ModifyKind::Any), EventKind::Write),
            (
                Backend::Modify(ModifyKind::Name(RenameMode::From)),
                EventKind::Rename,
            ),
            (
                Backend::Modify(ModifyKind::Name(RenameMode::To)),
                EventKind::Rename,
            ),
            (
                Backend::Modify(ModifyKind::Name(RenameMode::Any)),
                EventKind::Rename,
            ),
        ];
        for (backend_kind, expected) in cases {
            assert_eq!(classify(&backend_kind).unwrap(), Some(expected), "{backend_kind:?}");
        }
    }

    #[test]
    fn test_classify_skips_unsubscribed_kinds() {
        use notify::EventKind as Backend;

        assert_eq!(
            classify(&Backend::Access(AccessKind::Close(AccessMode::Write))).unwrap(),
            None
        );
        assert_eq!(
            classify(&Backend::Modify(ModifyKind::Metadata(MetadataKind::Any))).unwrap(),
            None
        );
        assert_eq!(
            classify(&Backend::Modify(ModifyKind::Name(RenameMode::Both))).unwrap(),
            None
        );
    }

    #[test]
    fn test_classify_rejects_unknown_kinds() {
        use notify::EventKind as Backend;

        for kind in [Backend::Any, Backend::Other, Backend::Modify(ModifyKind::Other)] {
            let err = classify(&kind).unwrap_err();
            assert!(err.is_protocol_violation());
        }
    }

    #[test]
    fn test_decode_uses_basename() {
        let event = backend(
            notify::EventKind::Create(CreateKind::File),
            &["/scratch/source/move from outside"],
        );
        let decoded = decode(event, EventMask::ALL).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].basename, "move from outside");
        assert_eq!(decoded[0].kind, EventKind::Create);
    }

    #[test]
    fn test_decode_one_event_per_path() {
        let event = backend(
            notify::EventKind::Modify(ModifyKind::Name(RenameMode::Any)),
            &["/scratch/source/a", "/scratch/source/b"],
        );
        let decoded = decode(event, EventMask::ALL).unwrap();
        let names: Vec<&str> = decoded.iter().map(|e| e.basename.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_decode_respects_mask() {
        let event = backend(
            notify::EventKind::Modify(ModifyKind::Data(DataChange::Any)),
            &["/scratch/source/1M"],
        );
        let mask = EventMask::NONE.with(EventKind::Create);
        assert!(decode(event, mask).unwrap().is_empty());
    }

    #[test]
    fn test_decode_unknown_kind_carries_path() {
        let event = backend(notify::EventKind::Other, &["/scratch/source/1M"]);
        let err = decode(event, EventMask::ALL).unwrap_err();
        assert_eq!(err.path().map(|p| p.as_str()), Some("/scratch/source/1M"));
    }

    #[test]
    fn test_observed_event_root_path() {
        let event = ObservedEvent::new(Utf8PathBuf::from("/"), EventKind::Delete);
        assert_eq!(event.basename, "/");
    }
}
