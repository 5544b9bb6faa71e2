//! Read-only projection of a live agent.

use super::{AgentName, AgentState};
use serde::{Deserialize, Serialize};

/// Snapshot of a registry entry used for listing.
///
/// The name, type and provider come from the registry's own record of the
/// spawn; only the state is read from the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Agent name.
    pub name: AgentName,
    /// Agent type tag.
    pub agent_type: String,
    /// Provider key that built the agent.
    pub provider: String,
    /// State at the time of the snapshot.
    pub state: AgentState,
}
