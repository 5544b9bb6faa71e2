//! Provider error taxonomy.

use crate::agent::domain::{AgentName, AgentState};
use thiserror::Error;

/// Result type for agent and provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures raised by agents and providers.
///
/// Backend-native errors are mapped into these variants at the provider
/// boundary and never escape it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backend is unreachable or refused the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend ran but reported a failure.
    #[error("{}", api_message(message, *status_code))]
    Api {
        /// Backend-supplied description.
        message: String,
        /// HTTP status or process exit code, when known.
        status_code: Option<i32>,
    },

    /// The backend did not answer in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Unclassified backend failure.
    #[error("provider error: {0}")]
    Generic(String),

    /// The agent cannot take a message in its current state.
    #[error("agent '{agent}' cannot accept a message while {state}")]
    NotReady {
        /// Agent that rejected the call.
        agent: AgentName,
        /// State at the time of the call.
        state: AgentState,
    },
}

fn api_message(message: &str, status_code: Option<i32>) -> String {
    match status_code {
        Some(code) => format!("API error ({code}): {message}"),
        None => format!("API error: {message}"),
    }
}

impl ProviderError {
    /// Builds an [`ProviderError::Api`] value.
    #[must_use]
    pub fn api(message: impl Into<String>, status_code: Option<i32>) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
        }
    }

    /// Returns whether retrying the same request later may succeed.
    ///
    /// Timeouts, rate limits and server-side API failures are recoverable;
    /// authentication, state and unclassified failures are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Api {
                status_code: Some(code),
                ..
            } => *code == 429 || (*code >= 500 && *code <= 599),
            Self::Api { .. } | Self::Auth(_) | Self::Generic(_) | Self::NotReady { .. } => false,
        }
    }

    /// Returns the status or exit code carried by an API error.
    #[must_use]
    pub const fn status_code(&self) -> Option<i32> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
