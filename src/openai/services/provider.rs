//! Provider building [`OpenAiAgent`]s.

use super::OpenAiAgent;
use crate::agent::domain::{AgentConfig, credential_keys};
use crate::agent::ports::{Agent, AgentProvider, ProviderError, ProviderResult};
use crate::openai::domain::{ApiKeyStrategy, ProviderProfile};
use crate::openai::ports::{ChatClientFactory, ChatEndpoint};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Catalog key of the OpenAI-compatible provider.
pub const OPENAI_PROVIDER_KEY: &str = "openai";

/// Reads one environment variable.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

fn process_env() -> EnvLookup {
    Arc::new(|key| std::env::var(key).ok())
}

/// Builds chat agents, resolving endpoint and key per configuration.
///
/// The endpoint comes from the `base_url` credential or the named
/// `profile`; the key follows [`ApiKeyStrategy`].
pub struct OpenAiProvider<C>
where
    C: Clock + Send + Sync,
{
    factory: Arc<dyn ChatClientFactory>,
    clock: Arc<C>,
    env: EnvLookup,
}

impl<C> OpenAiProvider<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a provider reading keys from the process environment.
    #[must_use]
    pub fn new(factory: Arc<dyn ChatClientFactory>, clock: Arc<C>) -> Self {
        Self {
            factory,
            clock,
            env: process_env(),
        }
    }

    /// Replaces the environment lookup.
    #[must_use]
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Resolves the endpoint for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Generic`] for an unknown profile and
    /// [`ProviderError::Auth`] when no key can be found.
    pub fn resolve_endpoint(&self, config: &AgentConfig) -> ProviderResult<ChatEndpoint> {
        let credentials = config.credentials();
        let profile = credentials
            .get_str(credential_keys::PROFILE)
            .map(|name| {
                ProviderProfile::builtin(name).ok_or_else(|| {
                    ProviderError::Generic(format!(
                        "profile '{name}' not found (available: {})",
                        ProviderProfile::names().join(", ")
                    ))
                })
            })
            .transpose()?;

        let base_url = credentials
            .get_str(credential_keys::BASE_URL)
            .or_else(|| profile.and_then(ProviderProfile::base_url));
        let api_key_env = credentials
            .get_str(credential_keys::API_KEY_ENV)
            .or_else(|| profile.and_then(ProviderProfile::api_key_env));
        let mut headers = profile.map(ProviderProfile::headers).unwrap_or_default();
        headers.extend(credentials.default_headers());

        let api_key = ApiKeyStrategy::new()
            .with_explicit(credentials.get_str(credential_keys::API_KEY))
            .with_env_var(api_key_env)
            .with_base_url(base_url)
            .resolve(&*self.env)
            .ok_or_else(|| {
                ProviderError::Auth(
                    "no API key found; set the api_key credential, the variable named by \
                     api_key_env, or OPENAI_API_KEY"
                        .to_owned(),
                )
            })?;

        Ok(ChatEndpoint {
            base_url: base_url.map(str::to_owned),
            api_key,
            headers,
        })
    }
}

#[async_trait]
impl<C> AgentProvider for OpenAiProvider<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn provider_type(&self) -> &str {
        OPENAI_PROVIDER_KEY
    }

    async fn create_agent(&self, config: &AgentConfig) -> ProviderResult<Arc<dyn Agent>> {
        let endpoint = self.resolve_endpoint(config)?;
        let model = config.model().ok_or_else(|| {
            ProviderError::Generic("a model is required for OpenAI-compatible agents".to_owned())
        })?;
        let client = self.factory.connect(&endpoint)?;
        tracing::debug!(
            agent = %config.name(),
            model,
            base_url = ?endpoint.base_url,
            "creating chat agent"
        );
        Ok(Arc::new(OpenAiAgent::new(
            config.name().clone(),
            model,
            config.instructions(),
            client,
            Arc::clone(&self.clock),
        )))
    }

    async fn validate_credentials(&self) -> bool {
        ApiKeyStrategy::new().resolve(&*self.env).is_some()
    }
}
