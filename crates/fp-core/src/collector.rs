//! Per-basename event logs.
//!
//! [`EventCollector`] maps a file basename to the ordered list of
//! [`EventKind`]s observed for it during one probe run. It is an owned value:
//! the orchestration loop creates it, writes to it from its single consumer
//! task and hands it back when the run completes. There is no internal
//! locking; a multi-consumer binding has to wrap it in a mutex.

use smallvec::SmallVec;

use crate::hash::{fx_hash_map_with_capacity, FxHashMap};
use crate::kind::EventKind;

/// Event log for one basename. Most basenames see only a handful of events.
pub type EventLog = SmallVec<[EventKind; 8]>;

/// Accumulates observed event kinds keyed by basename.
///
/// # Examples
///
/// ```
/// use fp_core::{EventCollector, EventKind};
///
/// let mut collector = EventCollector::new();
/// collector.record("1byte", EventKind::Create);
/// collector.record("1byte", EventKind::Write);
///
/// assert_eq!(collector.tokens_for("1byte"), vec!['C', 'W']);
/// assert!(collector.tokens_for("never-seen").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    logs: FxHashMap<String, EventLog>,
    total: usize,
}

impl EventCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            logs: fx_hash_map_with_capacity(16),
            total: 0,
        }
    }

    /// Appends `kind` to the log for `basename`, creating the log if absent.
    pub fn record(&mut self, basename: &str, kind: EventKind) {
        match self.logs.get_mut(basename) {
            Some(log) => log.push(kind),
            None => {
                let mut log = EventLog::new();
                log.push(kind);
                self.logs.insert(basename.to_owned(), log);
            }
        }
        self.total += 1;
    }

    /// Returns the kinds recorded for `basename` in arrival order.
    #[must_use]
    pub fn kinds_for(&self, basename: &str) -> &[EventKind] {
        match self.logs.get(basename) {
            Some(log) => log.as_slice(),
            None => &[],
        }
    }

    /// Returns the report tokens recorded for `basename` in arrival order.
    ///
    /// Empty if nothing was recorded for it.
    #[must_use]
    pub fn tokens_for(&self, basename: &str) -> Vec<char> {
        self.kinds_for(basename).iter().map(|k| k.token()).collect()
    }

    /// Returns how many times `kind` was recorded for `basename`.
    #[must_use]
    pub fn count(&self, basename: &str, kind: EventKind) -> usize {
        self.kinds_for(basename).iter().filter(|k| **k == kind).count()
    }

    /// Returns the recorded basenames in sorted order.
    #[must_use]
    pub fn basenames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.logs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of events recorded across all basenames.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` if nothing has been recorded.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_call_order() {
        let mut collector = EventCollector::new();
        collector.record("move aside", EventKind::Rename);
        collector.record("move aside", EventKind::Create);
        collector.record("move aside", EventKind::Rename);

        assert_eq!(collector.tokens_for("move aside"), vec!['R', 'C', 'R']);
        assert_eq!(collector.count("move aside", EventKind::Rename), 2);
    }

    #[test]
    fn test_unrecorded_basename_is_empty() {
        let collector = EventCollector::new();
        assert!(collector.tokens_for("delete").is_empty());
        assert!(collector.kinds_for("delete").is_empty());
        assert!(collector.is_empty());
    }

    #[test]
    fn test_basenames_are_independent() {
        let mut collector = EventCollector::new();
        collector.record("move aside", EventKind::Rename);
        collector.record("move aside target", EventKind::Rename);
        collector.record("move aside target", EventKind::Create);

        assert_eq!(collector.tokens_for("move aside"), vec!['R']);
        assert_eq!(collector.tokens_for("move aside target"), vec!['R', 'C']);
        assert_eq!(collector.basenames(), vec!["move aside", "move aside target"]);
        assert_eq!(collector.total(), 3);
    }

    #[test]
    fn test_large_log_spills_inline_storage() {
        let mut collector = EventCollector::new();
        for _ in 0..100 {
            collector.record("1M", EventKind::Write);
        }
        assert_eq!(collector.count("1M", EventKind::Write), 100);
    }
}
