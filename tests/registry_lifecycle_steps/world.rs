//! Shared world state for registry lifecycle scenarios.

use maestro::agent::{
    domain::{AgentConfig, AgentInfo, AgentName},
    services::{AgentRegistry, ProviderCatalog, RegistryResult, ShutdownReport},
};
use maestro::message::domain::Message;
use maestro::sdk::{adapters::memory::ScriptedTransport, services::SdkProvider};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Scenario world for registry lifecycle behaviour tests.
pub struct RegistryWorld {
    /// Registry under test, backed by a scripted SDK transport.
    pub registry: AgentRegistry,
    /// Result of the last spawn attempt made in a `When` step.
    pub last_spawn: Option<RegistryResult<AgentInfo>>,
    /// Report of the last bulk shutdown.
    pub last_report: Option<ShutdownReport>,
    /// Replies collected from the last message.
    pub replies: Vec<Message>,
}

impl RegistryWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let provider = SdkProvider::new(Arc::new(ScriptedTransport::new()), Arc::new(DefaultClock));
        Self {
            registry: AgentRegistry::new(ProviderCatalog::new().with_provider(Arc::new(provider))),
            last_spawn: None,
            last_report: None,
            replies: Vec::new(),
        }
    }
}

impl Default for RegistryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistryWorld {
    RegistryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses an agent name from step text.
pub fn agent_name(raw: &str) -> Result<AgentName, eyre::Report> {
    AgentName::new(raw).map_err(|err| eyre::eyre!("invalid agent name '{raw}': {err}"))
}

/// Builds a one-shot SDK agent configuration.
pub fn sdk_config(raw: &str) -> Result<AgentConfig, eyre::Report> {
    AgentConfig::new(agent_name(raw)?, "sdk").map_err(|err| eyre::eyre!("invalid config: {err}"))
}
