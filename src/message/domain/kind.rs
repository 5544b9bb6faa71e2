//! Message classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a canonical message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Conversational output meant for the reader.
    Chat,
    /// Operational output such as tool invocations, tool results and
    /// non-successful completion summaries.
    System,
    /// An instruction directed at the orchestration layer itself.
    Command,
}

impl MessageKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::System => "system",
            Self::Command => "command",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = ParseMessageKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "chat" => Ok(Self::Chat),
            "system" => Ok(Self::System),
            "command" => Ok(Self::Command),
            _ => Err(ParseMessageKindError(value.to_owned())),
        }
    }
}

/// Error returned when a message kind string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message kind: {0}")]
pub struct ParseMessageKindError(pub String);
