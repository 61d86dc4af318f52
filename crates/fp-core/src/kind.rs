//! The closed vocabulary of change-notification kinds.
//!
//! Every notification the probe accepts decodes to exactly one [`EventKind`].
//! Each kind has a single-character token used by the event log and the
//! compressed report.
//!
//! | Kind | Token |
//! |------|-------|
//! | [`EventKind::Write`] | `W` |
//! | [`EventKind::Create`] | `C` |
//! | [`EventKind::Delete`] | `D` |
//! | [`EventKind::Rename`] | `R` |

use std::fmt;

use serde::{Deserialize, Serialize};

/// A filesystem change-notification kind.
///
/// # Examples
///
/// ```
/// use fp_core::EventKind;
///
/// assert_eq!(EventKind::Write.token(), 'W');
/// assert_eq!(EventKind::from_token('R'), Some(EventKind::Rename));
/// assert_eq!(EventKind::from_token('x'), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// File contents were written.
    Write,
    /// A file or directory appeared.
    Create,
    /// A file or directory was removed.
    Delete,
    /// A file or directory was renamed (either half of a move).
    Rename,
}

impl EventKind {
    /// All kinds, in token order `W`, `C`, `D`, `R`.
    pub const ALL: [Self; 4] = [Self::Write, Self::Create, Self::Delete, Self::Rename];

    /// Returns the single-character report token for this kind.
    #[inline]
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Write => 'W',
            Self::Create => 'C',
            Self::Delete => 'D',
            Self::Rename => 'R',
        }
    }

    /// Decodes a report token back into its kind.
    #[inline]
    #[must_use]
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            'W' => Some(Self::Write),
            'C' => Some(Self::Create),
            'D' => Some(Self::Delete),
            'R' => Some(Self::Rename),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
