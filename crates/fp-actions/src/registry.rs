//! Ordered action registry and sequencer.
//!
//! This module provides [`ActionRegistry`], which owns the actions of one
//! probe run in declaration order. That order is both the order filesystem
//! mutations happen in and the order report lines are printed in.
//!
//! # Usage
//!
//! ```no_run
//! use fp_actions::ActionRegistry;
//! use camino::Utf8Path;
//!
//! let mut registry = ActionRegistry::new(Utf8Path::new("./testing_monitor/source"));
//!
//! // Pre-create fixture files before any watch is installed
//! registry.run_setup()?;
//!
//! // ... install the watch ...
//!
//! registry.run_actions()?;
//! # Ok::<(), fp_actions::ActionError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::action::{Action, Scenario};
use crate::error::ActionError;

/// The actions of one probe run, in report order.
///
/// Names are unique within a registry; observed events are attributed to
/// actions by basename, so two actions sharing a name would share a log.
///
/// # Example
///
/// ```
/// use fp_actions::ActionRegistry;
/// use camino::Utf8Path;
///
/// let registry = ActionRegistry::new(Utf8Path::new("/scratch/source"));
/// assert_eq!(registry.len(), 8);
/// assert_eq!(registry.names().first(), Some(&"empty"));
/// ```
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    /// The watched root all actions are bound to.
    root: Utf8PathBuf,

    /// Actions in declaration order.
    actions: Vec<Action>,
}

impl ActionRegistry {
    /// Creates the full registry of all eight scenarios bound to `root`.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            actions: Scenario::ALL
                .into_iter()
                .map(|scenario| Action::new(scenario, root))
                .collect(),
        }
    }

    /// Creates a registry from a subset of scenarios, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::DuplicateName`] if a scenario appears twice.
    pub fn from_scenarios(
        root: &Utf8Path,
        scenarios: impl IntoIterator<Item = Scenario>,
    ) -> Result<Self, ActionError> {
        let mut actions: Vec<Action> = Vec::new();
        for scenario in scenarios {
            if actions.iter().any(|a| a.scenario() == scenario) {
                return Err(ActionError::DuplicateName(scenario.name()));
            }
            actions.push(Action::new(scenario, root));
        }
        Ok(Self {
            root: root.to_owned(),
            actions,
        })
    }

    /// Runs every action's setup step, in order.
    ///
    /// Must complete before the watch is installed so fixture writes are
    /// never observed.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failure.
    pub fn run_setup(&mut self) -> Result<(), ActionError> {
        for (n, action) in self.actions.iter_mut().enumerate() {
            info!(label = action.scenario().label(), "Setup {n:02}: {}", action.name());
            action.setup()?;
        }
        debug!(count = self.actions.len(), "Setup complete");
        Ok(())
    }

    /// Runs every action's operation, in order, back to back.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failure.
    pub fn run_actions(&self) -> Result<(), ActionError> {
        for (n, action) in self.actions.iter().enumerate() {
            info!(label = action.scenario().label(), "Action {n:02}: {}", action.name());
            action.act()?;
        }
        debug!(count = self.actions.len(), "Actions complete");
        Ok(())
    }

    /// Returns the watched root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Iterates the actions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Returns the action names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.iter().map(Action::name).collect()
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the registry holds no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<'a> IntoIterator for &'a ActionRegistry {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
