//! Subscription masks for watch events.
//!
//! An [`EventMask`] names the [`EventKind`]s a watch subscribes to. Decoded
//! events whose kind is outside the mask are dropped in the watcher callback,
//! before they reach the event channel, the same way a kernel-side
//! subscription never delivers unrequested kinds.
//!
//! # Examples
//!
//! ```
//! use fp_core::EventKind;
//! use fp_watcher::EventMask;
//!
//! let mask = EventMask::NONE.with(EventKind::Create).with(EventKind::Delete);
//! assert!(mask.contains(EventKind::Create));
//! assert!(!mask.contains(EventKind::Write));
//! assert!(EventMask::ALL.contains(EventKind::Rename));
//! ```

use std::fmt;

use fp_core::EventKind;

/// A set of subscribed event kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventMask(u8);

impl EventMask {
    /// Subscribes to nothing.
    pub const NONE: Self = Self(0);

    /// Subscribes to all four kinds.
    pub const ALL: Self = Self(0b1111);

    const fn bit(kind: EventKind) -> u8 {
        match kind {
            EventKind::Write => 0b0001,
            EventKind::Create => 0b0010,
            EventKind::Delete => 0b0100,
            EventKind::Rename => 0b1000,
        }
    }

    /// Builds a mask from a list of kinds.
    #[must_use]
    pub fn from_kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        kinds.into_iter().fold(Self::NONE, Self::with)
    }

    /// Returns this mask with `kind` added.
    #[inline]
    #[must_use]
    pub const fn with(self, kind: EventKind) -> Self {
        Self(self.0 | Self::bit(kind))
    }

    /// Returns `true` if `kind` is subscribed.
    #[inline]
    #[must_use]
    pub const fn contains(self, kind: EventKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    /// Returns `true` if no kind is subscribed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the subscribed kinds in token order.
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

impl fmt::Display for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in self.kinds() {
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl FromIterator<EventKind> for EventMask {
    fn from_iter<T: IntoIterator<Item = EventKind>>(iter: T) -> Self {
        Self::from_kinds(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_every_kind() {
        for kind in EventKind::ALL {
            assert!(EventMask::ALL.contains(kind));
            assert!(!EventMask::NONE.contains(kind));
        }
    }

    #[test]
    fn test_from_kinds() {
        let mask: EventMask = [EventKind::Write, EventKind::Rename].into_iter().collect();
        assert!(mask.contains(EventKind::Write));
        assert!(mask.contains(EventKind::Rename));
        assert!(!mask.contains(EventKind::Create));
        assert_eq!(mask.to_string(), "WR");
    }

    #[test]
    fn test_from_all_kinds_equals_all() {
        assert_eq!(EventMask::from_kinds(EventKind::ALL), EventMask::ALL);
        assert!(EventMask::NONE.is_empty());
        assert!(!EventMask::ALL.is_empty());
    }

    #[test]
    fn test_debug_lists_kinds() {
        let mask = EventMask::NONE.with(EventKind::Delete);
        assert_eq!(format!("{mask:?}"), "{Delete}");
    }
}
