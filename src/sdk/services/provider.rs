//! Provider building [`SdkAgent`]s.

use super::{RecoveryController, SdkAgent};
use crate::agent::domain::AgentConfig;
use crate::agent::ports::{Agent, AgentProvider, ProviderResult};
use crate::sdk::domain::{ExecutionMode, SdkOptions};
use crate::sdk::ports::SdkTransport;
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Catalog key of the SDK provider.
pub const SDK_PROVIDER_KEY: &str = "sdk";

/// Builds agents that share one transport.
pub struct SdkProvider<T, C>
where
    T: SdkTransport,
    C: Clock + Send + Sync,
{
    transport: Arc<T>,
    clock: Arc<C>,
    recovery: RecoveryController,
}

impl<T, C> SdkProvider<T, C>
where
    T: SdkTransport,
    C: Clock + Send + Sync,
{
    /// Creates a provider over `transport`.
    #[must_use]
    pub fn new(transport: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            transport,
            clock,
            recovery: RecoveryController::default(),
        }
    }

    /// Sets the recovery policy handed to session agents.
    #[must_use]
    pub const fn with_recovery(mut self, recovery: RecoveryController) -> Self {
        self.recovery = recovery;
        self
    }
}

#[async_trait]
impl<T, C> AgentProvider for SdkProvider<T, C>
where
    T: SdkTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn provider_type(&self) -> &str {
        SDK_PROVIDER_KEY
    }

    async fn create_agent(&self, config: &AgentConfig) -> ProviderResult<Arc<dyn Agent>> {
        let options = SdkOptions::from_config(config);
        let mode = ExecutionMode::from_credentials(config.credentials());
        tracing::debug!(
            agent = %config.name(),
            mode = mode.as_str(),
            model = ?options.model,
            permission_mode = %options.permission_mode,
            "creating SDK agent"
        );
        Ok(Arc::new(
            SdkAgent::new(
                config.name().clone(),
                options,
                mode,
                Arc::clone(&self.transport),
                Arc::clone(&self.clock),
            )
            .with_recovery(self.recovery),
        ))
    }

    async fn validate_credentials(&self) -> bool {
        self.transport.is_available()
    }
}
