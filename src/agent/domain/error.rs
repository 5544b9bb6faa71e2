//! Error types for agent domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name contains whitespace or control characters.
    #[error("agent name '{0}' must not contain whitespace or control characters")]
    InvalidAgentName(String),

    /// The agent name exceeds the 100-character limit.
    #[error("agent name exceeds 100 character limit: {0}")]
    AgentNameTooLong(String),

    /// The provider key is empty after trimming.
    #[error("provider must not be empty")]
    EmptyProvider,
}

/// Error returned while parsing an agent state string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent state: {0}")]
pub struct ParseAgentStateError(pub String);
