//! Declarative agent configuration.

use super::{AgentDomainError, AgentName, Credentials};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input to agent creation.
///
/// Only `name` and `provider` are mandatory. Fields meaningless to a given
/// provider are ignored by that provider rather than rejected.
///
/// # Examples
///
/// ```
/// use maestro::agent::domain::{AgentConfig, AgentName};
///
/// let name = AgentName::new("reviewer").expect("valid name");
/// let config = AgentConfig::new(name, "sdk")
///     .expect("valid config")
///     .with_model("sonnet")
///     .with_allowed_tools(["Read", "Grep"]);
///
/// assert_eq!(config.agent_type(), "sdk");
/// assert_eq!(config.model(), Some("sonnet"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    name: AgentName,
    provider: String,
    agent_type: String,
    model: Option<String>,
    instructions: Option<String>,
    allowed_tools: Option<Vec<String>>,
    working_directory: Option<PathBuf>,
    permission_mode: Option<String>,
    setting_sources: Option<Vec<String>>,
    #[serde(default)]
    credentials: Credentials,
}

impl AgentConfig {
    /// Creates a configuration for `name` built by the `provider` key.
    ///
    /// The agent type defaults to the provider key.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyProvider`] when `provider` is blank.
    pub fn new(name: AgentName, provider: impl Into<String>) -> Result<Self, AgentDomainError> {
        let provider = provider.into().trim().to_owned();
        if provider.is_empty() {
            return Err(AgentDomainError::EmptyProvider);
        }

        Ok(Self {
            name,
            agent_type: provider.clone(),
            provider,
            model: None,
            instructions: None,
            allowed_tools: None,
            working_directory: None,
            permission_mode: None,
            setting_sources: None,
            credentials: Credentials::new(),
        })
    }

    /// Overrides the agent type tag.
    #[must_use]
    pub fn with_agent_type(mut self, agent_type: impl Into<String>) -> Self {
        self.agent_type = agent_type.into();
        self
    }

    /// Sets the backend model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the system or role prompt.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Sets the tool whitelist.
    #[must_use]
    pub fn with_allowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the working directory for the backend.
    #[must_use]
    pub fn with_working_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    /// Sets the backend permission mode.
    #[must_use]
    pub fn with_permission_mode(mut self, mode: impl Into<String>) -> Self {
        self.permission_mode = Some(mode.into());
        self
    }

    /// Sets project-context loading directives.
    #[must_use]
    pub fn with_setting_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.setting_sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    /// Sets one credential entry.
    #[must_use]
    pub fn with_credential(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.credentials.insert(key, value);
        self
    }

    /// Replaces the whole credential map.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Returns the agent name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the provider key.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns the agent type tag.
    #[must_use]
    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    /// Returns the model identifier, if set.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the instructions, if set.
    #[must_use]
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Returns the tool whitelist, if set.
    #[must_use]
    pub fn allowed_tools(&self) -> Option<&[String]> {
        self.allowed_tools.as_deref()
    }

    /// Returns the working directory, if set.
    #[must_use]
    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    /// Returns the permission mode, if set.
    #[must_use]
    pub fn permission_mode(&self) -> Option<&str> {
        self.permission_mode.as_deref()
    }

    /// Returns the setting sources, if set.
    #[must_use]
    pub fn setting_sources(&self) -> Option<&[String]> {
        self.setting_sources.as_deref()
    }

    /// Returns the credential map.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
