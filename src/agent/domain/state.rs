//! Agent lifecycle state machine.

use super::ParseAgentStateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle state of a live agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Ready to accept a message.
    Idle,
    /// Handling a message.
    Processing,
    /// Resuming a session stream after a transient backend signal.
    Restarting,
    /// The last message ended in an unrecoverable error.
    Failed,
    /// Shut down. No further transitions are possible.
    Terminated,
}

impl AgentState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Restarting => "restarting",
            Self::Failed => "failed",
            Self::Terminated => "terminated",
        }
    }

    /// Returns whether a new message may be accepted in this state.
    #[must_use]
    pub const fn accepts_messages(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle | Self::Failed, Self::Processing)
                | (
                    Self::Processing,
                    Self::Idle | Self::Failed | Self::Restarting
                )
                | (Self::Restarting, Self::Processing | Self::Failed)
                | (
                    Self::Idle | Self::Processing | Self::Restarting | Self::Failed,
                    Self::Terminated
                )
        )
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentState {
    type Error = ParseAgentStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "idle" => Ok(Self::Idle),
            "processing" => Ok(Self::Processing),
            "restarting" => Ok(Self::Restarting),
            "failed" => Ok(Self::Failed),
            "terminated" => Ok(Self::Terminated),
            _ => Err(ParseAgentStateError(value.to_owned())),
        }
    }
}

/// Shared, thread-safe holder of an agent's current state.
///
/// Agent implementations own one cell each and drive every transition
/// through it so the table in [`AgentState::can_transition_to`] is enforced
/// in one place.
#[derive(Debug)]
pub struct AgentStateCell {
    state: Mutex<AgentState>,
}

impl Default for AgentStateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentStateCell {
    /// Creates a cell in the `idle` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(AgentState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AgentState> {
        // The guarded value is a plain `Copy` enum, so a poisoned lock still
        // holds a coherent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current state.
    #[must_use]
    pub fn get(&self) -> AgentState {
        *self.lock()
    }

    /// Atomically moves to `processing` if the agent accepts messages.
    ///
    /// The returned guard settles the state when the work ends. Dropping it
    /// without settling marks the agent `failed`.
    ///
    /// # Errors
    ///
    /// Returns the blocking state when the agent is busy or terminated.
    pub fn begin(&self) -> Result<ProcessingGuard<'_>, AgentState> {
        let mut state = self.lock();
        if state.accepts_messages() {
            *state = AgentState::Processing;
            Ok(ProcessingGuard {
                cell: self,
                settled: false,
            })
        } else {
            Err(*state)
        }
    }

    /// Moves to `target` when the transition table allows it.
    ///
    /// Returns `false` and leaves the state unchanged otherwise, which is the
    /// case for every transition out of `terminated`.
    pub fn transition(&self, target: AgentState) -> bool {
        let mut state = self.lock();
        if state.can_transition_to(target) {
            *state = target;
            true
        } else {
            if *state != target {
                tracing::debug!(from = %*state, to = %target, "agent state transition rejected");
            }
            false
        }
    }

    /// Moves to `terminated` from any state.
    pub fn terminate(&self) {
        *self.lock() = AgentState::Terminated;
    }
}

/// Settles an in-flight message to `idle` or `failed`.
#[derive(Debug)]
#[must_use = "dropping the guard marks the agent failed"]
pub struct ProcessingGuard<'a> {
    cell: &'a AgentStateCell,
    settled: bool,
}

impl ProcessingGuard<'_> {
    /// Marks the message handled successfully.
    pub fn succeed(mut self) {
        self.settled = true;
        self.cell.transition(AgentState::Idle);
    }

    /// Marks the message failed.
    pub fn fail(mut self) {
        self.settled = true;
        self.cell.transition(AgentState::Failed);
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled && self.cell.transition(AgentState::Failed) {
            tracing::warn!("message stream abandoned before completion; agent marked failed");
        }
    }
}
