//! Scratch tree preparation.
//!
//! ```text
//! <root>/                 recreated on every run
//!   monitor.log           default report destination
//!   move outside          lands here after the move-outside action
//!   move from outside     created here by the move-from-outside setup
//!   source/               the watched subtree
//! ```

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use fp_core::ScratchConfig;
use tracing::debug;

use crate::error::HarnessError;

/// A freshly created scratch tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scratch {
    root: Utf8PathBuf,
    watched: Utf8PathBuf,
    report_path: Utf8PathBuf,
}

impl Scratch {
    /// Deletes and recreates the scratch tree described by `config`.
    ///
    /// A relative root resolves against the current directory. Anything
    /// already at the root is removed, so consecutive runs start clean.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Scratch`] if removal or creation fails.
    pub fn prepare(config: &ScratchConfig) -> Result<Self, HarnessError> {
        let root = std::path::absolute(&config.root)
            .map_err(|e| HarnessError::scratch(&config.root, e))?;
        let root = Utf8PathBuf::try_from(root)
            .map_err(|e| HarnessError::NonUtf8Path(e.into_path_buf()))?;

        match std::fs::remove_dir_all(&root) {
            Ok(()) => debug!(path = %root, "Removed previous scratch tree"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(HarnessError::scratch(root, e)),
        }
        std::fs::create_dir_all(&root).map_err(|e| HarnessError::scratch(&root, e))?;

        let watched = root.join(&config.watched_dir);
        std::fs::create_dir(&watched).map_err(|e| HarnessError::scratch(&watched, e))?;

        let report_path = root.join(&config.report_file);
        Ok(Self {
            root,
            watched,
            report_path,
        })
    }

    /// The scratch root, parent of the watched subtree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The watched subtree.
    #[must_use]
    pub fn watched(&self) -> &Utf8Path {
        &self.watched
    }

    /// Where the report goes when no destination is given.
    #[must_use]
    pub fn default_report_path(&self) -> &Utf8Path {
        &self.report_path
    }
}
