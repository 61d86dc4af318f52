//! Raw file-change notifications bridged to async consumers.
//!
//! This crate wraps the `notify` crate's platform watcher (inotify, FSEvents,
//! ReadDirectoryChangesW, kqueue) and streams every notification, decoded to
//! the probe's four-kind vocabulary, through a bounded tokio channel.
//! Nothing is debounced or coalesced here: finding out what the backend
//! actually delivers is the point of the probe.
//!
//! # Overview
//!
//! - [`FileWatcher`] installs a recursive watch and streams [`EventResult`]s
//! - [`EventMask`] selects which kinds are delivered
//! - [`classify`] and [`decode`] map backend events to [`ObservedEvent`]s
//! - [`WatchError`] covers installation, channel and protocol failures
//!
//! # Usage
//!
//! ```no_run
//! use camino::Utf8Path;
//! use fp_core::{EventCollector, WatchConfig};
//! use fp_watcher::{EventMask, FileWatcher};
//! use tokio::time::{sleep, Duration};
//!
//! # async fn example() -> Result<(), fp_watcher::WatchError> {
//! let mut watcher = FileWatcher::new(
//!     Utf8Path::new("./scratch"),
//!     &WatchConfig::default(),
//!     EventMask::ALL,
//! ).await?;
//! let mut collector = EventCollector::new();
//! let deadline = sleep(Duration::from_secs(1));
//! tokio::pin!(deadline);
//!
//! loop {
//!     tokio::select! {
//!         Some(event) = watcher.recv() => {
//!             let event = event?;
//!             collector.record(&event.basename, event.kind);
//!         }
//!         () = &mut deadline => break,
//!     }
//! }
//! watcher.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod mask;
pub mod watcher;

// Re-export error types
pub use error::WatchError;

// Re-export event types
pub use events::{classify, decode, DecodedEvents, ObservedEvent};

// Re-export mask types
pub use mask::EventMask;

// Re-export watcher types
pub use watcher::{EventResult, FileWatcher};
