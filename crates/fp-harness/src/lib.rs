//! Probe orchestration: scratch tree, action driver, event collection and
//! the report.
//!
//! This crate ties the others together. [`Scratch`] prepares a clean tree,
//! [`Probe`] installs a watch on it, drives an
//! [`ActionRegistry`](fp_actions::ActionRegistry) while collecting what the
//! backend reports, and [`report`] renders the result one line per action.
//!
//! # Architecture
//!
//! ```text
//! crates/fp-harness/src/
//!   lib.rs           # Public API exports
//!   error.rs         # HarnessError
//!   scratch.rs       # Scratch tree preparation
//!   probe.rs         # Driver task, collection loop, drain
//!   report.rs        # Report rendering
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use fp_actions::ActionRegistry;
//! use fp_core::ProbeConfig;
//! use fp_harness::{Probe, Scratch};
//!
//! # async fn example() -> Result<(), fp_harness::HarnessError> {
//! let config = ProbeConfig::default();
//! let scratch = Scratch::prepare(&config.scratch)?;
//! let registry = ActionRegistry::new(scratch.watched());
//!
//! let mut stdout = std::io::stdout();
//! Probe::new(config).run(registry, &mut stdout).await?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod probe;
pub mod report;
pub mod scratch;

// Public re-exports
pub use error::HarnessError;
pub use probe::{Probe, ProbeOutcome};
pub use scratch::Scratch;
