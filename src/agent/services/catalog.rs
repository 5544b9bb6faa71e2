//! Provider lookup by string key.

use crate::agent::ports::AgentProvider;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Set of providers keyed by [`AgentProvider::provider_type`].
///
/// Registering a second provider with the same key replaces the first.
#[derive(Clone, Default)]
pub struct ProviderCatalog {
    providers: HashMap<String, Arc<dyn AgentProvider>>,
}

impl ProviderCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog with `provider` registered.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn AgentProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Registers `provider` under its own type key.
    pub fn register(&mut self, provider: Arc<dyn AgentProvider>) {
        let key = provider.provider_type().to_owned();
        tracing::debug!(provider = %key, "registered provider");
        self.providers.insert(key, provider);
    }

    /// Returns the provider registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<dyn AgentProvider>> {
        self.providers.get(key).cloned()
    }

    /// Returns the registered keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.providers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("providers", &self.keys())
            .finish()
    }
}
