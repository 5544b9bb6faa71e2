//! Transport port for reaching the coding-agent backend.

use crate::agent::ports::ProviderError;
use crate::sdk::domain::{SdkEvent, SdkOptions};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use thiserror::Error;

/// Native event stream. Ends after its first `Err` item.
pub type SdkEventStream<'a> = BoxStream<'a, Result<SdkEvent, TransportError>>;

/// Launches backend executions and opens persistent sessions.
#[async_trait]
pub trait SdkTransport: Send + Sync {
    /// Starts a fresh execution of `prompt` and streams its events to
    /// completion.
    ///
    /// Launch failures surface as the first stream item.
    fn query(&self, options: &SdkOptions, prompt: &str) -> SdkEventStream<'static>;

    /// Opens a persistent connection configured with `options`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend cannot be started.
    async fn connect(&self, options: &SdkOptions)
    -> Result<Box<dyn SessionConnection>, TransportError>;

    /// Cheaply checks whether the backend can be launched.
    fn is_available(&self) -> bool;
}

/// A persistent, single-owner backend connection.
#[async_trait]
pub trait SessionConnection: Send {
    /// Submits the next prompt.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the prompt cannot be delivered.
    async fn send(&mut self, prompt: &str) -> Result<(), TransportError>;

    /// Streams events of the current response cycle up to and including its
    /// `result` event.
    ///
    /// After an error item, calling this again resumes from the next unread
    /// event.
    fn receive(&mut self) -> SdkEventStream<'_>;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend does not exit cleanly.
    async fn disconnect(&mut self) -> Result<(), TransportError>;
}

/// Category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The backend executable could not be found.
    CliNotFound,
    /// The connection to the backend broke.
    Connection,
    /// The backend process exited unsuccessfully.
    Process,
    /// A line of backend output could not be decoded.
    MessageParse,
    /// Any other backend failure.
    Sdk,
}

impl TransportErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CliNotFound => "cli_not_found",
            Self::Connection => "connection",
            Self::Process => "process",
            Self::MessageParse => "message_parse",
            Self::Sdk => "sdk",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    exit_code: Option<i32>,
}

impl TransportError {
    fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            exit_code: None,
        }
    }

    /// The backend executable is missing.
    pub fn cli_not_found(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::CliNotFound, message)
    }

    /// The connection broke.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connection, message)
    }

    /// The backend process exited with `exit_code`.
    pub fn process(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            ..Self::new(TransportErrorKind::Process, message)
        }
    }

    /// Backend output could not be decoded.
    pub fn message_parse(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::MessageParse, message)
    }

    /// Unclassified backend failure.
    pub fn sdk(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Sdk, message)
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the process exit code, when known.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

impl From<TransportError> for ProviderError {
    fn from(error: TransportError) -> Self {
        match error.kind {
            TransportErrorKind::CliNotFound => Self::Auth(error.message),
            TransportErrorKind::Process => Self::Api {
                message: error.message,
                status_code: error.exit_code,
            },
            TransportErrorKind::Connection
            | TransportErrorKind::MessageParse
            | TransportErrorKind::Sdk => Self::Generic(error.to_string()),
        }
    }
}
