//! Wiring of the standard providers from [`Settings`].

use crate::agent::services::{AgentRegistry, ProviderCatalog};
use crate::openai::adapters::http::HttpChatClientFactory;
use crate::openai::services::OpenAiProvider;
use crate::sdk::adapters::cli::CliTransport;
use crate::sdk::services::SdkProvider;
use crate::settings::Settings;
use mockable::DefaultClock;
use std::sync::Arc;

/// Builds a catalog holding the `sdk` and `openai` providers.
///
/// The SDK provider drives the CLI at `settings.sdk.cli_path`; the OpenAI
/// provider reads keys from the process environment.
#[must_use]
pub fn standard_catalog(settings: &Settings) -> ProviderCatalog {
    let clock = Arc::new(DefaultClock);
    let transport = Arc::new(
        CliTransport::new(settings.sdk.cli_path.as_str())
            .with_disconnect_timeout(settings.sdk.disconnect_timeout()),
    );
    let sdk = SdkProvider::new(transport, Arc::clone(&clock))
        .with_recovery(settings.sdk.recovery());
    let openai = OpenAiProvider::new(
        Arc::new(HttpChatClientFactory::new(settings.openai.request_timeout())),
        clock,
    );
    tracing::debug!(cli_path = %settings.sdk.cli_path, "standard providers wired");
    ProviderCatalog::new()
        .with_provider(Arc::new(sdk))
        .with_provider(Arc::new(openai))
}

/// Builds an empty registry over [`standard_catalog`].
#[must_use]
pub fn standard_registry(settings: &Settings) -> AgentRegistry {
    AgentRegistry::new(standard_catalog(settings))
}
