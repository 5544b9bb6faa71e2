//! Streaming chat-completions port.

use super::ChatError;
use crate::openai::domain::ChatRequest;
use async_openai::types::CreateChatCompletionStreamResponse;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Owned stream of decoded completion chunks.
pub type ChunkStream = BoxStream<'static, Result<CreateChatCompletionStreamResponse, ChatError>>;

/// A client for one OpenAI-compatible endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    /// Starts a streaming completion.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] when the request is refused before the first
    /// chunk arrives. Failures mid-stream arrive as stream items, and the
    /// stream ends after the first one.
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChunkStream, ChatError>;
}

/// Where and how to reach an endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatEndpoint {
    /// Base URL; `None` selects the public OpenAI API.
    pub base_url: Option<String>,
    /// Bearer token.
    pub api_key: String,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl std::fmt::Debug for ChatEndpoint {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ChatEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("headers", &self.headers)
            .finish()
    }
}

/// Builds a client per agent endpoint.
pub trait ChatClientFactory: Send + Sync {
    /// Returns a client bound to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] when the client cannot be configured, for
    /// example because a header value is not valid HTTP.
    fn connect(&self, endpoint: &ChatEndpoint) -> Result<Arc<dyn ChatCompletions>, ChatError>;
}
