//! Report rendering.
//!
//! One line per action, in registry order: the action name, a colon, a
//! space, then the run-length compressed tokens observed for that name.
//! An action nothing was observed for still gets a line with an empty
//! token string.

use std::fmt::Write as _;
use std::io;

use fp_core::{EventCollector, RunLengthCompressor};

use crate::error::HarnessError;

/// Renders the report line for `name` without the trailing newline.
#[must_use]
pub fn render_line(name: &str, collector: &EventCollector) -> String {
    let mut line = String::with_capacity(name.len() + 16);
    line.push_str(name);
    line.push_str(": ");

    let mut rle = RunLengthCompressor::new(&mut line);
    for kind in collector.kinds_for(name) {
        // Writing into a String cannot fail
        let _ = rle.push(kind.token());
    }
    let _ = rle.flush();
    line
}

/// Renders the whole report for `names` into a string.
#[must_use]
pub fn render_to_string<'a>(
    names: impl IntoIterator<Item = &'a str>,
    collector: &EventCollector,
) -> String {
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "{}", render_line(name, collector));
    }
    out
}

/// Writes the report for `names` to `out` and flushes it.
///
/// # Errors
///
/// Returns [`HarnessError::Report`] if writing or flushing fails.
pub fn render<'a, W: io::Write + ?Sized>(
    names: impl IntoIterator<Item = &'a str>,
    collector: &EventCollector,
    out: &mut W,
) -> Result<(), HarnessError> {
    for name in names {
        writeln!(out, "{}", render_line(name, collector)).map_err(HarnessError::Report)?;
    }
    out.flush().map_err(HarnessError::Report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_core::EventKind;

    fn collector_from(entries: &[(&str, &[EventKind])]) -> EventCollector {
        let mut collector = EventCollector::new();
        for (name, kinds) in entries {
            for kind in *kinds {
                collector.record(name, *kind);
            }
        }
        collector
    }

    #[test]
    fn test_render_line_compresses_runs() {
        let collector = collector_from(&[(
            "1M",
            &[
                EventKind::Create,
                EventKind::Write,
                EventKind::Write,
                EventKind::Write,
            ],
        )]);
        assert_eq!(render_line("1M", &collector), "1M: CW(3)");
    }

    #[test]
    fn test_render_line_without_events() {
        let collector = EventCollector::new();
        assert_eq!(render_line("empty", &collector), "empty: ");
    }

    #[test]
    fn test_render_typical_report() {
        use EventKind::{Create as C, Delete as D, Rename as R, Write as W};

        let collector = collector_from(&[
            ("empty", &[C]),
            ("1byte", &[C, W]),
            ("1M", &[C, W, W, W, W]),
            ("delete", &[D]),
            ("move outside", &[R]),
            ("move aside", &[R]),
            ("move aside target", &[R]),
            ("move from outside", &[R]),
        ]);
        let names = ["empty", "1byte", "1M", "delete", "move outside", "move aside", "move from outside"];

        insta::assert_snapshot!(render_to_string(names, &collector), @r"
        empty: C
        1byte: CW
        1M: CW(4)
        delete: D
        move outside: R
        move aside: R
        move from outside: R
        ");
    }

    #[test]
    fn test_render_ignores_unregistered_basenames() {
        let collector = collector_from(&[
            ("move aside target", &[EventKind::Rename]),
            ("monitor.log", &[EventKind::Write]),
        ]);

        insta::assert_snapshot!(render_to_string(["move aside"], &collector), @"move aside: ");
    }

    #[test]
    fn test_render_writes_and_flushes() {
        let collector = collector_from(&[("delete", &[EventKind::Delete])]);
        let mut out = Vec::new();
        render(["delete", "empty"], &collector, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "delete: D\nempty: \n");
    }

    #[test]
    fn test_render_propagates_write_failure() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = render(["empty"], &EventCollector::new(), &mut Broken).unwrap_err();
        assert!(matches!(err, HarnessError::Report(_)));
    }
}
