//! Bulk shutdown results.

use crate::agent::domain::AgentName;
use crate::agent::ports::ProviderError;

/// Result of shutting down one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownOutcome {
    /// Agent that was shut down.
    pub name: AgentName,
    /// `Ok` when the agent released its resources cleanly.
    pub result: Result<(), ProviderError>,
}

impl ShutdownOutcome {
    /// Returns whether the shutdown succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a bulk shutdown, ordered by agent name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    outcomes: Vec<ShutdownOutcome>,
}

impl ShutdownReport {
    /// Creates a report from per-agent outcomes.
    #[must_use]
    pub const fn new(outcomes: Vec<ShutdownOutcome>) -> Self {
        Self { outcomes }
    }

    /// Returns every outcome.
    #[must_use]
    pub fn outcomes(&self) -> &[ShutdownOutcome] {
        &self.outcomes
    }

    /// Returns the number of agents the report covers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` when no agent was shut down.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns the names of agents that shut down cleanly.
    pub fn succeeded(&self) -> impl Iterator<Item = &AgentName> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .map(|outcome| &outcome.name)
    }

    /// Returns the agents whose shutdown failed, with the error.
    pub fn failed(&self) -> impl Iterator<Item = (&AgentName, &ProviderError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|e| (&outcome.name, e)))
    }

    /// Returns `true` when every agent shut down cleanly.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(ShutdownOutcome::is_success)
    }
}
