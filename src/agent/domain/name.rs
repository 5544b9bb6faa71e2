//! Validated agent name type.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an agent name.
const MAX_NAME_LENGTH: usize = 100;

/// Unique, human-readable key of a live agent within a registry.
///
/// Names are trimmed on construction. They must be non-empty, at most 100
/// characters long, and free of whitespace and control characters so they can
/// be used verbatim as message senders and recipients.
///
/// # Examples
///
/// ```
/// use maestro::agent::domain::AgentName;
///
/// let name = AgentName::new("  code-reviewer ").expect("valid name");
/// assert_eq!(name.as_str(), "code-reviewer");
/// assert!(AgentName::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentName`] when the value is empty
    /// after trimming, [`AgentDomainError::AgentNameTooLong`] when it exceeds
    /// 100 characters, or [`AgentDomainError::InvalidAgentName`] when it
    /// contains whitespace or control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentName);
        }

        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(AgentDomainError::AgentNameTooLong(raw));
        }

        if normalized
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AgentDomainError::InvalidAgentName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the agent name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AgentName {
    type Error = AgentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentName> for String {
    fn from(value: AgentName) -> Self {
        value.0
    }
}
