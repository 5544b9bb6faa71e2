//! Capability contracts implemented by every backend family.

use super::ProviderResult;
use crate::agent::domain::{AgentConfig, AgentName, AgentState};
use crate::message::domain::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Lazy, ordered sequence of messages produced for one request.
///
/// A stream ends after its first `Err` item.
pub type MessageStream<'a> = BoxStream<'a, ProviderResult<Message>>;

/// A named, stateful participant backed by an execution backend.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent name.
    fn name(&self) -> &AgentName;

    /// Returns the agent type tag.
    fn agent_type(&self) -> &str;

    /// Returns the current lifecycle state.
    fn state(&self) -> AgentState;

    /// Handles one message, yielding response messages as they arrive.
    ///
    /// The returned stream must be driven to completion. A busy or
    /// terminated agent yields a single [`super::ProviderError::NotReady`].
    fn handle_message(&self, message: Message) -> MessageStream<'_>;

    /// Releases backend resources and moves the agent to `terminated`.
    ///
    /// Calling this more than once is allowed.
    ///
    /// # Errors
    ///
    /// Returns a [`super::ProviderError`] when releasing resources fails. The
    /// agent is terminated regardless.
    async fn shutdown(&self) -> ProviderResult<()>;
}

/// Factory for a family of agents sharing one backend.
#[async_trait]
pub trait AgentProvider: Send + Sync {
    /// Returns the stable provider identifier.
    fn provider_type(&self) -> &str;

    /// Builds a new agent in the `idle` state.
    ///
    /// # Errors
    ///
    /// Returns a [`super::ProviderError`] when the configuration cannot be
    /// satisfied by this backend.
    async fn create_agent(&self, config: &AgentConfig) -> ProviderResult<Arc<dyn Agent>>;

    /// Cheaply checks whether the backend is reachable.
    ///
    /// Never runs a full execution.
    async fn validate_credentials(&self) -> bool;
}
