//! Name-keyed ownership of live agents.
//!
//! Provides [`AgentRegistry`], the single authority over which agents exist.
//! Lookups clone an `Arc` out of a short critical section; no lock is held
//! across an `await`.

use super::{ProviderCatalog, ShutdownOutcome, ShutdownReport};
use crate::agent::{
    domain::{AgentConfig, AgentInfo, AgentName, AgentState},
    ports::{Agent, ProviderError},
};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No agent is registered under the name.
    #[error("agent not found: {0}")]
    NotFound(AgentName),

    /// An agent with the name is already registered or being spawned.
    #[error("agent already exists: {0}")]
    AlreadyExists(AgentName),

    /// The configuration names a provider that is not in the catalog.
    #[error("unknown provider '{provider}' (available: {})", available.join(", "))]
    UnknownProvider {
        /// Requested provider key.
        provider: String,
        /// Registered provider keys.
        available: Vec<String>,
    },

    /// The provider or agent failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Optional filters for [`AgentRegistry::list_agents`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentFilter {
    state: Option<AgentState>,
    provider: Option<String>,
}

impl AgentFilter {
    /// Creates a filter that matches every agent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only agents in `state`.
    #[must_use]
    pub const fn with_state(mut self, state: AgentState) -> Self {
        self.state = Some(state);
        self
    }

    /// Keeps only agents built by `provider`.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    fn matches(&self, info: &AgentInfo) -> bool {
        self.state.is_none_or(|state| state == info.state)
            && self
                .provider
                .as_deref()
                .is_none_or(|provider| provider == info.provider)
    }
}

struct RegistryEntry {
    agent: Arc<dyn Agent>,
    provider: String,
    agent_type: String,
}

impl RegistryEntry {
    fn info(&self, name: &AgentName) -> AgentInfo {
        AgentInfo {
            name: name.clone(),
            agent_type: self.agent_type.clone(),
            provider: self.provider.clone(),
            state: self.agent.state(),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<AgentName, RegistryEntry>,
    pending: HashSet<AgentName>,
}

type SharedState = Arc<RwLock<RegistryState>>;

// The map stays structurally valid if a holder panicked, so poisoning is
// recovered rather than surfaced.
fn read(state: &RwLock<RegistryState>) -> RwLockReadGuard<'_, RegistryState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &RwLock<RegistryState>) -> RwLockWriteGuard<'_, RegistryState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Releases a name reservation when a spawn finishes, fails or is cancelled.
struct Reservation<'a> {
    state: &'a RwLock<RegistryState>,
    name: AgentName,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        write(self.state).pending.remove(&self.name);
    }
}

/// Removes an entry when a shutdown settles, however it ends.
///
/// Only the agent being shut down is removed; an agent spawned under the
/// same name in the meantime stays registered.
struct Removal<'a> {
    state: &'a RwLock<RegistryState>,
    name: &'a AgentName,
    agent: &'a Arc<dyn Agent>,
}

impl Drop for Removal<'_> {
    fn drop(&mut self) {
        let mut state = write(self.state);
        let current = state
            .entries
            .get(self.name)
            .is_some_and(|entry| Arc::ptr_eq(&entry.agent, self.agent));
        if current {
            state.entries.remove(self.name);
        }
    }
}

/// Tracks live agents by name and builds them through a [`ProviderCatalog`].
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct AgentRegistry {
    catalog: Arc<ProviderCatalog>,
    state: SharedState,
}

impl AgentRegistry {
    /// Creates an empty registry using `catalog` to resolve providers.
    #[must_use]
    pub fn new(catalog: ProviderCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            state: Arc::new(RwLock::new(RegistryState::default())),
        }
    }

    /// Builds and registers an agent.
    ///
    /// The name is reserved before the provider is awaited, so concurrent
    /// spawns of one name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProvider`] when `config.provider()` is
    /// not registered, [`RegistryError::AlreadyExists`] when the name is taken,
    /// or [`RegistryError::Provider`] when agent construction fails.
    pub async fn spawn(&self, config: &AgentConfig) -> RegistryResult<AgentInfo> {
        let name = config.name();
        let provider = self.catalog.get(config.provider()).ok_or_else(|| {
            RegistryError::UnknownProvider {
                provider: config.provider().to_owned(),
                available: self.catalog.keys(),
            }
        })?;

        let reservation = self.reserve(name)?;

        let agent = provider.create_agent(config).await.inspect_err(|error| {
            tracing::warn!(
                agent = %name,
                provider = config.provider(),
                %error,
                "agent creation failed"
            );
        })?;

        let entry = RegistryEntry {
            agent,
            provider: config.provider().to_owned(),
            agent_type: config.agent_type().to_owned(),
        };
        let info = entry.info(name);
        {
            let mut state = write(&self.state);
            state.pending.remove(name);
            state.entries.insert(name.clone(), entry);
        }
        drop(reservation);

        tracing::info!(
            agent = %name,
            provider = %info.provider,
            agent_type = %info.agent_type,
            "agent spawned"
        );
        Ok(info)
    }

    fn reserve(&self, name: &AgentName) -> RegistryResult<Reservation<'_>> {
        let mut state = write(&self.state);
        if state.entries.contains_key(name) || state.pending.contains(name) {
            return Err(RegistryError::AlreadyExists(name.clone()));
        }
        state.pending.insert(name.clone());
        Ok(Reservation {
            state: &self.state,
            name: name.clone(),
        })
    }

    /// Returns the agent registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no such agent exists.
    pub fn get(&self, name: &AgentName) -> RegistryResult<Arc<dyn Agent>> {
        read(&self.state)
            .entries
            .get(name)
            .map(|entry| Arc::clone(&entry.agent))
            .ok_or_else(|| {
                tracing::debug!(agent = %name, "agent lookup missed");
                RegistryError::NotFound(name.clone())
            })
    }

    /// Returns the snapshot of the agent registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no such agent exists.
    pub fn info(&self, name: &AgentName) -> RegistryResult<AgentInfo> {
        read(&self.state)
            .entries
            .get(name)
            .map(|entry| entry.info(name))
            .ok_or_else(|| RegistryError::NotFound(name.clone()))
    }

    /// Returns whether an agent is registered under `name`.
    #[must_use]
    pub fn has(&self, name: &AgentName) -> bool {
        read(&self.state).entries.contains_key(name)
    }

    /// Returns snapshots of agents matching `filter`, sorted by name.
    #[must_use]
    pub fn list_agents(&self, filter: &AgentFilter) -> Vec<AgentInfo> {
        let mut agents: Vec<AgentInfo> = read(&self.state)
            .entries
            .iter()
            .map(|(name, entry)| entry.info(name))
            .filter(|info| filter.matches(info))
            .collect();
        agents.sort_by(|left, right| left.name.cmp(&right.name));
        agents
    }

    /// Shuts down one agent and removes it from the registry.
    ///
    /// The entry is removed even when the agent's shutdown fails.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no such agent exists, or
    /// [`RegistryError::Provider`] carrying the agent's shutdown failure.
    pub async fn shutdown_agent(&self, name: &AgentName) -> RegistryResult<()> {
        let agent = self.get(name)?;
        Ok(self.shutdown_entry(name, agent).await?)
    }

    async fn shutdown_entry(
        &self,
        name: &AgentName,
        agent: Arc<dyn Agent>,
    ) -> Result<(), ProviderError> {
        let _removal = Removal {
            state: &self.state,
            name,
            agent: &agent,
        };
        match agent.shutdown().await {
            Ok(()) => {
                tracing::info!(agent = %name, "agent shut down");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(agent = %name, %error, "agent shutdown failed; entry removed");
                Err(error)
            }
        }
    }

    /// Shuts down every registered agent concurrently.
    ///
    /// Individual failures are recorded in the report and never stop the
    /// remaining shutdowns.
    pub async fn shutdown_all(&self) -> ShutdownReport {
        let mut targets: Vec<(AgentName, Arc<dyn Agent>)> = read(&self.state)
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), Arc::clone(&entry.agent)))
            .collect();
        targets.sort_by(|left, right| left.0.cmp(&right.0));

        let results = join_all(
            targets
                .iter()
                .map(|(name, agent)| self.shutdown_entry(name, Arc::clone(agent))),
        )
        .await;

        let outcomes: Vec<ShutdownOutcome> = targets
            .into_iter()
            .zip(results)
            .map(|((name, _), result)| ShutdownOutcome { name, result })
            .collect();
        let report = ShutdownReport::new(outcomes);
        tracing::info!(
            total = report.len(),
            failed = report.failed().count(),
            "bulk shutdown finished"
        );
        report
    }

    /// Returns the registered provider keys in ascending order.
    #[must_use]
    pub fn providers(&self) -> Vec<String> {
        self.catalog.keys()
    }

    /// Runs the cheap credential check of one provider.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProvider`] when `provider` is not
    /// registered.
    pub async fn validate_provider(&self, provider: &str) -> RegistryResult<bool> {
        let resolved = self
            .catalog
            .get(provider)
            .ok_or_else(|| RegistryError::UnknownProvider {
                provider: provider.to_owned(),
                available: self.catalog.keys(),
            })?;
        Ok(resolved.validate_credentials().await)
    }
}
