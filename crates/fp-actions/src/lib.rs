//! Scripted filesystem actions for the fsprobe harness.
//!
//! This crate defines the fixed set of filesystem scenarios whose change
//! notifications the probe records, and the registry that sequences them.
//!
//! # Overview
//!
//! - [`Scenario`]: the closed set of eight operations
//! - [`Action`]: a scenario bound to a watched root, with `setup` and `act`
//! - [`ActionRegistry`]: ordered ownership plus `run_setup` / `run_actions`
//! - [`ActionError`]: fixture failures, all fatal for a run
//!
//! # Example
//!
//! ```no_run
//! use fp_actions::{ActionRegistry, Scenario};
//! use camino::Utf8Path;
//!
//! let root = Utf8Path::new("./testing_monitor/source");
//! let mut registry = ActionRegistry::from_scenarios(root, [Scenario::Delete])?;
//! registry.run_setup()?;
//! registry.run_actions()?;
//! # Ok::<(), fp_actions::ActionError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod action;
pub mod error;
pub mod registry;

pub use action::{Action, Scenario, BURST_PAUSE};
pub use error::{ActionError, FsOp};
pub use registry::ActionRegistry;
