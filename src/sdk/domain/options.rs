//! Backend options derived from an agent configuration.

use crate::agent::domain::{AgentConfig, Credentials, credential_keys};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Permission mode applied when the configuration leaves it unset.
///
/// Agents run unattended, so a mode that waits for interactive approval
/// would block forever.
pub const DEFAULT_PERMISSION_MODE: &str = "acceptEdits";

/// Options fixed for the lifetime of an SDK agent.
///
/// Only fields explicitly set on the configuration are carried; absent
/// fields are left to the backend's own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkOptions {
    /// System prompt.
    pub system_prompt: Option<String>,
    /// Model identifier.
    pub model: Option<String>,
    /// Tool whitelist.
    pub allowed_tools: Option<Vec<String>>,
    /// Working directory for the backend process.
    pub cwd: Option<PathBuf>,
    /// Project-context loading directives.
    pub setting_sources: Option<Vec<String>>,
    /// Permission posture.
    pub permission_mode: String,
}

impl SdkOptions {
    /// Maps the relevant fields of `config`.
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            system_prompt: config.instructions().map(str::to_owned),
            model: config.model().map(str::to_owned),
            allowed_tools: config.allowed_tools().map(<[String]>::to_vec),
            cwd: config.working_directory().map(PathBuf::from),
            setting_sources: config.setting_sources().map(<[String]>::to_vec),
            permission_mode: config
                .permission_mode()
                .unwrap_or(DEFAULT_PERMISSION_MODE)
                .to_owned(),
        }
    }
}

impl Default for SdkOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            model: None,
            allowed_tools: None,
            cwd: None,
            setting_sources: None,
            permission_mode: DEFAULT_PERMISSION_MODE.to_owned(),
        }
    }
}

/// How an SDK agent drives its backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Fresh backend execution per message.
    #[default]
    OneShot,
    /// One persistent connection reused across messages.
    Session,
}

impl ExecutionMode {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneShot => "one_shot",
            Self::Session => "session",
        }
    }

    /// Reads the `mode` credential.
    ///
    /// `query`/`oneshot` select one-shot and `client`/`session` select a
    /// session. Anything else falls back to one-shot.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let Some(raw) = credentials.get_str(credential_keys::MODE) else {
            return Self::OneShot;
        };
        match raw.to_ascii_lowercase().as_str() {
            "query" | "oneshot" | "one_shot" => Self::OneShot,
            "client" | "session" => Self::Session,
            other => {
                tracing::warn!(mode = other, "unrecognised execution mode; using one-shot");
                Self::OneShot
            }
        }
    }
}
