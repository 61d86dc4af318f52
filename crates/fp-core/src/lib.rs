//! Core types, errors, and utilities for the fsprobe harness.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - [`EventKind`] - the closed Write/Create/Delete/Rename vocabulary
//! - [`EventCollector`] - per-basename event logs for one run
//! - [`RunLengthCompressor`] - compact `token(count)` rendering of event logs
//! - Configuration structures ([`ProbeConfig`] and friends)
//! - [`ConfigError`] for configuration failures
//!
//! # Crate Dependencies
//!
//! ```text
//! fp-cli ──► fp-harness ──► fp-actions ──► fp-core
//!                       └─► fp-watcher ──►
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod collector;
pub mod compress;
pub mod config;
pub mod error;
pub mod hash;
pub mod kind;

pub use collector::{EventCollector, EventLog};
pub use compress::{compress, expand, RunLengthCompressor};
pub use config::{DriverConfig, ProbeConfig, ScratchConfig, WatchConfig};
pub use error::ConfigError;
pub use hash::{fx_hash_map_with_capacity, FxHashMap};
pub use kind::EventKind;
