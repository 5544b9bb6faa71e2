//! Layered runtime settings.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `MAESTRO__*` environment variables where `__` separates nested keys
//! (`MAESTRO__SDK__CLI_PATH=/opt/bin/claude`).

use crate::sdk::services::RecoveryController;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Prefix of recognised environment variables.
pub const ENV_PREFIX: &str = "MAESTRO";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or did not match the schema.
    #[error("failed to load settings: {0}")]
    Load(#[source] Box<config::ConfigError>),
}

impl From<config::ConfigError> for SettingsError {
    fn from(error: config::ConfigError) -> Self {
        Self::Load(Box::new(error))
    }
}

/// Log output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `maestro=debug`.
    pub level: String,
    /// Output encoding.
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// `[sdk]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SdkSettings {
    /// CLI executable name or path.
    pub cli_path: String,
    /// Consecutive stream restarts allowed per response.
    pub max_stream_restarts: u32,
    /// Grace period for a session process to exit.
    pub disconnect_timeout_secs: u64,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            cli_path: "claude".to_owned(),
            max_stream_restarts: RecoveryController::DEFAULT_MAX_RESTARTS,
            disconnect_timeout_secs: 5,
        }
    }
}

impl SdkSettings {
    /// Returns the disconnect grace period.
    #[must_use]
    pub const fn disconnect_timeout(&self) -> Duration {
        Duration::from_secs(self.disconnect_timeout_secs)
    }

    /// Returns the session recovery policy.
    #[must_use]
    pub const fn recovery(&self) -> RecoveryController {
        RecoveryController::new(self.max_stream_restarts)
    }
}

/// `[openai]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Per-request deadline in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
        }
    }
}

impl OpenAiSettings {
    /// Returns the per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Complete runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logging.
    pub log: LogSettings,
    /// Coding-agent CLI backend.
    pub sdk: SdkSettings,
    /// OpenAI-compatible backend.
    pub openai: OpenAiSettings,
}

impl Settings {
    /// Loads settings from `file` (if given and present) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the file is malformed or a value
    /// has the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::build(file, None)
    }

    /// Like [`Settings::load`] but reads variables from `env` instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the file is malformed or a value
    /// has the wrong type.
    pub fn load_with_env<S: std::hash::BuildHasher>(
        file: Option<&Path>,
        env: &HashMap<String, String, S>,
    ) -> Result<Self, SettingsError> {
        let vars: config::Map<String, String> = env
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self::build(file, Some(vars))
    }

    fn build(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );
        let settings: Self = builder.build()?.try_deserialize()?;
        tracing::debug!(?file, cli_path = %settings.sdk.cli_path, "settings loaded");
        Ok(settings)
    }
}
