//! Scripted filesystem scenarios.
//!
//! A [`Scenario`] is one of eight fixed filesystem operations whose
//! notifications the probe records. An [`Action`] binds a scenario to the
//! watched root and carries the little state a scenario needs between its
//! setup and its main operation.
//!
//! | Scenario | Name | Setup | Operation |
//! |----------|------|-------|-----------|
//! | `empty` | `empty` | - | create a zero-byte file |
//! | `one-byte` | `1byte` | - | create, write one byte |
//! | `one-megabyte` | `1M` | - | create, 1000 writes of 1000 bytes |
//! | `one-and-one-megabyte` | `1and1M` | - | create, 1 MiB single-byte writes, pause, 1 MiB more |
//! | `delete` | `delete` | one-byte file | remove it |
//! | `move-outside` | `move outside` | one-byte file | rename to the root's parent |
//! | `move-aside` | `move aside` | one-byte file | rename to `move aside target` |
//! | `move-from-outside` | `move from outside` | one-byte file in the root's parent | rename into the root |
//!
//! The name doubles as the basename of the file under test, which is how
//! observed events are attributed back to the scenario.

use std::fs::{self, File};
use std::io::Write;
use std::thread;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{ActionError, FsOp};

/// Pause between the two write bursts of `one-and-one-megabyte`.
pub const BURST_PAUSE: Duration = Duration::from_millis(10);

/// Single-byte writes per burst in `one-and-one-megabyte`.
const BURST_WRITES: usize = 1024 * 1024;

/// Chunk count and size of `one-megabyte`.
const MEGABYTE_CHUNKS: usize = 1000;
const CHUNK_SIZE: usize = 1000;

/// Suffix of the rename target of `move-aside`.
const ASIDE_SUFFIX: &str = " target";

/// The closed set of filesystem scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Create a zero-byte file.
    Empty,
    /// Create a file and write one byte.
    OneByte,
    /// Create a file and write 1,000,000 bytes in 1000 chunks.
    OneMegabyte,
    /// Two bursts of single-byte writes separated by [`BURST_PAUSE`].
    OneAndOneMegabyte,
    /// Remove a pre-created file.
    Delete,
    /// Move a pre-created file out of the watched subtree.
    MoveOutside,
    /// Rename a pre-created file within the watched directory.
    MoveAside,
    /// Move a file created outside the watched subtree into it.
    MoveFromOutside,
}

impl Scenario {
    /// All scenarios in report order.
    pub const ALL: [Self; 8] = [
        Self::Empty,
        Self::OneByte,
        Self::OneMegabyte,
        Self::OneAndOneMegabyte,
        Self::Delete,
        Self::MoveOutside,
        Self::MoveAside,
        Self::MoveFromOutside,
    ];

    /// Report key and basename of the file under test.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::OneByte => "1byte",
            Self::OneMegabyte => "1M",
            Self::OneAndOneMegabyte => "1and1M",
            Self::Delete => "delete",
            Self::MoveOutside => "move outside",
            Self::MoveAside => "move aside",
            Self::MoveFromOutside => "move from outside",
        }
    }

    /// Kebab-case label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::OneByte => "one-byte",
            Self::OneMegabyte => "one-megabyte",
            Self::OneAndOneMegabyte => "one-and-one-megabyte",
            Self::Delete => "delete",
            Self::MoveOutside => "move-outside",
            Self::MoveAside => "move-aside",
            Self::MoveFromOutside => "move-from-outside",
        }
    }

    /// Returns `true` if the scenario pre-creates a file in its setup step.
    #[must_use]
    pub const fn has_setup(self) -> bool {
        matches!(
            self,
            Self::Delete | Self::MoveOutside | Self::MoveAside | Self::MoveFromOutside
        )
    }
}

/// A scenario bound to a watched root.
#[derive(Debug, Clone)]
pub struct Action {
    scenario: Scenario,
    root: Utf8PathBuf,
    /// Outside file created by the `move-from-outside` setup.
    source: Option<Utf8PathBuf>,
}

impl Action {
    /// Binds `scenario` to the watched directory `root`.
    #[must_use]
    pub fn new(scenario: Scenario, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            scenario,
            root: root.into(),
            source: None,
        }
    }

    /// Report key and basename of the file under test.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.scenario.name()
    }

    /// The bound scenario.
    #[inline]
    #[must_use]
    pub const fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// The watched root this action operates in.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the file under test inside the watched root.
    #[must_use]
    pub fn target(&self) -> Utf8PathBuf {
        self.root.join(self.name())
    }

    /// Prepares the precondition of the scenario.
    ///
    /// Safe to repeat: files are truncated and rewritten.
    pub fn setup(&mut self) -> Result<(), ActionError> {
        match self.scenario {
            Scenario::Empty
            | Scenario::OneByte
            | Scenario::OneMegabyte
            | Scenario::OneAndOneMegabyte => Ok(()),
            Scenario::Delete | Scenario::MoveOutside | Scenario::MoveAside => {
                write_one_byte(&self.target())
            }
            Scenario::MoveFromOutside => {
                let source = self.outside()?;
                write_one_byte(&source)?;
                self.source = Some(source);
                Ok(())
            }
        }
    }

    /// Performs the operation under observation.
    pub fn act(&self) -> Result<(), ActionError> {
        let target = self.target();
        match self.scenario {
            Scenario::Empty => close(create(&target)?, &target),
            Scenario::OneByte => write_one_byte(&target),
            Scenario::OneMegabyte => {
                let mut file = create(&target)?;
                let chunk = [0_u8; CHUNK_SIZE];
                for _ in 0..MEGABYTE_CHUNKS {
                    write(&mut file, &chunk, &target)?;
                }
                close(file, &target)
            }
            Scenario::OneAndOneMegabyte => {
                let mut file = create(&target)?;
                for _ in 0..BURST_WRITES {
                    write(&mut file, &[1], &target)?;
                }
                thread::sleep(BURST_PAUSE);
                for _ in 0..BURST_WRITES {
                    write(&mut file, &[1], &target)?;
                }
                close(file, &target)
            }
            Scenario::Delete => {
                fs::remove_file(&target).map_err(|e| ActionError::io(FsOp::Remove, &target, e))
            }
            Scenario::MoveOutside => rename(&target, &self.outside()?),
            Scenario::MoveAside => {
                let aside = self.root.join(format!("{}{ASIDE_SUFFIX}", self.name()));
                rename(&target, &aside)
            }
            Scenario::MoveFromOutside => {
                let source = self.source.as_ref().ok_or(ActionError::MissingSource {
                    name: self.name(),
                })?;
                rename(source, &target)
            }
        }
    }

    /// Same-named path in the parent of the watched root.
    fn outside(&self) -> Result<Utf8PathBuf, ActionError> {
        self.root
            .parent()
            .map(|parent| parent.join(self.name()))
            .ok_or_else(|| ActionError::RootHasNoParent(self.root.clone()))
    }
}

fn create(path: &Utf8Path) -> Result<File, ActionError> {
    File::create(path).map_err(|e| ActionError::io(FsOp::Create, path, e))
}

fn write(file: &mut File, bytes: &[u8], path: &Utf8Path) -> Result<(), ActionError> {
    file.write_all(bytes)
        .map_err(|e| ActionError::io(FsOp::Write, path, e))
}

/// Syncs `file` to disk and closes it, reporting write-back failures.
fn close(file: File, path: &Utf8Path) -> Result<(), ActionError> {
    file.sync_all()
        .map_err(|e| ActionError::io(FsOp::Close, path, e))
}

fn write_one_byte(path: &Utf8Path) -> Result<(), ActionError> {
    let mut file = create(path)?;
    write(&mut file, &[1], path)?;
    close(file, path)
}

fn rename(from: &Utf8Path, to: &Utf8Path) -> Result<(), ActionError> {
    fs::rename(from, to).map_err(|e| ActionError::rename(from, to, e))
}
