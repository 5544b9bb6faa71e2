//! Chat-completions transport errors.

use crate::agent::ports::ProviderError;
use thiserror::Error;

/// Failures of a chat-completions call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The service rejected the credentials (401 or 403).
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The service is throttling requests (429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The service answered with an error object outside the auth and
    /// throttling classes.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The request exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The service could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A streamed chunk could not be decoded.
    #[error("malformed stream chunk: {0}")]
    Decode(String),

    /// The request could not be built from the conversation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ChatError> for ProviderError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::Auth(message) => Self::Auth(message),
            ChatError::RateLimited(message) => Self::api(message, Some(429)),
            ChatError::Rejected(message) => Self::api(message, None),
            ChatError::Status { status, message } => Self::api(message, Some(i32::from(status))),
            ChatError::Timeout(message) => Self::Timeout(message),
            other @ (ChatError::Connection(_)
            | ChatError::Decode(_)
            | ChatError::InvalidRequest(_)) => {
                Self::Generic(other.to_string())
            }
        }
    }
}
