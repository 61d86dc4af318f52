//! Configuration structures for the fsprobe harness.
//!
//! This module provides configuration types for each stage of a probe run:
//!
//! - [`ScratchConfig`] - Scratch tree location and names
//! - [`WatchConfig`] - Notification channel and registration settings
//! - [`DriverConfig`] - Background action driver timing
//! - [`ProbeConfig`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with the values the probe
//! was calibrated with, and deserialize from partial JSON documents.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Location and layout of the scratch tree.
///
/// The harness owns `root` outright: it is deleted and recreated on every
/// run. The watched subtree is `root/watched_dir`, and files moved "outside"
/// the watch land directly in `root`.
///
/// # Examples
///
/// ```
/// use fp_core::ScratchConfig;
///
/// let config = ScratchConfig::default();
/// assert_eq!(config.root.as_str(), "testing_monitor");
/// assert_eq!(config.watched_dir, "source");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchConfig {
    /// Scratch root directory. Relative paths resolve against the working directory.
    pub root: Utf8PathBuf,

    /// Name of the watched subdirectory inside `root`.
    pub watched_dir: String,

    /// File name of the default report destination inside `root`.
    pub report_file: String,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("testing_monitor"),
            watched_dir: "source".to_owned(),
            report_file: "monitor.log".to_owned(),
        }
    }
}

/// Configuration for the notification watcher.
///
/// # Examples
///
/// ```
/// use fp_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.channel_capacity, 5);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Capacity of the bounded event channel between watcher and consumer.
    pub channel_capacity: usize,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,

    /// Pause after installing the watch and before the first action, in milliseconds.
    ///
    /// Gives the OS-level registration time to settle so the earliest
    /// events are not lost.
    pub registration_pause_ms: u64,
}

impl WatchConfig {
    /// Returns the registration pause as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn registration_pause(&self) -> Duration {
        Duration::from_millis(self.registration_pause_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 5,
            recursive: true,
            registration_pause_ms: 10,
        }
    }
}

/// Configuration for the background action driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Delay after the last action before signalling completion, in milliseconds.
    ///
    /// Trailing notifications that arrive within this window are captured.
    /// This is a best-effort bound, not a flush guarantee.
    pub settle_ms: u64,
}

impl DriverConfig {
    /// Returns the settle delay as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { settle_ms: 1000 }
    }
}

/// Root configuration for a probe run.
///
/// # Examples
///
/// ```
/// use fp_core::ProbeConfig;
///
/// let config = ProbeConfig::from_json_str(r#"{"driver": {"settle_ms": 250}}"#)?;
/// assert_eq!(config.driver.settle_ms, 250);
/// assert_eq!(config.watch.channel_capacity, 5);
/// # Ok::<(), fp_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Scratch tree configuration.
    pub scratch: ScratchConfig,

    /// Watcher configuration.
    pub watch: WatchConfig,

    /// Action driver configuration.
    pub driver: DriverConfig,
}

impl ProbeConfig {
    /// Parses and validates a configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks option values that serde alone cannot reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.channel_capacity == 0 {
            return Err(ConfigError::invalid_option(
                "watch.channel_capacity",
                "must be positive",
            ));
        }

        let dir = Utf8Path::new(&self.scratch.watched_dir);
        let mut components = dir.components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(camino::Utf8Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(ConfigError::invalid_option(
                "scratch.watched_dir",
                "must be a single directory name",
            ));
        }

        if self.scratch.report_file.is_empty() {
            return Err(ConfigError::invalid_option(
                "scratch.report_file",
                "must not be empty",
            ));
        }

        Ok(())
    }
}
