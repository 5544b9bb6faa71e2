//! `async-openai` client for OpenAI-compatible chat-completions endpoints.

use crate::openai::domain::{ChatMessage, ChatRequest, ChatRole, ToolCall};
use crate::openai::ports::{
    ChatClientFactory, ChatCompletions, ChatEndpoint, ChatError, ChunkStream,
};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionToolType, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, FunctionCall,
};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

/// Endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Prefix of the event-source error raised for a non-success status.
const STATUS_ERROR_PREFIX: &str = "Invalid status code: ";

/// Streaming chat client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client<OpenAIConfig>,
    url: String,
}

impl HttpChatClient {
    /// Builds a client for `endpoint`.
    ///
    /// Extra headers and the deadline live on the underlying HTTP client so
    /// they apply to every request, streaming included.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Connection`] when a header is not valid HTTP or
    /// the TLS backend cannot be initialised.
    pub fn new(endpoint: &ChatEndpoint, timeout: Duration) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &endpoint.headers {
            let invalid = |error: &dyn std::fmt::Display| {
                ChatError::Connection(format!("invalid header '{key}': {error}"))
            };
            let header_name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|error| invalid(&error))?;
            let header_value = HeaderValue::from_str(value).map_err(|error| invalid(&error))?;
            headers.insert(header_name, header_value);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|error| ChatError::Connection(error.to_string()))?;
        let base = endpoint
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        let config = OpenAIConfig::new()
            .with_api_base(base)
            .with_api_key(endpoint.api_key.as_str());
        Ok(Self {
            client: Client::with_config(config).with_http_client(http),
            url: format!("{base}/chat/completions"),
        })
    }

    /// Returns the completions URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Maps a non-success status to a [`ChatError`].
#[must_use]
pub fn status_error(status: StatusCode, detail: String) -> ChatError {
    let message = if detail.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_owned()
    } else {
        detail
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimited(message),
        other => ChatError::Status {
            status: other.as_u16(),
            message,
        },
    }
}

fn transport_error(error: &reqwest::Error) -> ChatError {
    if let Some(status) = error.status() {
        status_error(status, error.to_string())
    } else if error.is_timeout() {
        ChatError::Timeout(error.to_string())
    } else {
        ChatError::Connection(error.to_string())
    }
}

/// Classifies an error object returned in a response body.
fn api_error(error: &ApiError) -> ChatError {
    let kind = error.r#type.as_deref().unwrap_or_default();
    let message = error.message.clone();
    if kind.contains("auth") || message.to_ascii_lowercase().contains("api key") {
        ChatError::Auth(message)
    } else if kind.contains("rate_limit") || kind == "insufficient_quota" {
        ChatError::RateLimited(message)
    } else {
        ChatError::Rejected(message)
    }
}

/// Classifies an event-source failure, which only carries its rendering.
fn stream_error(message: String) -> ChatError {
    let code = message
        .strip_prefix(STATUS_ERROR_PREFIX)
        .and_then(|rest| rest.get(..3))
        .and_then(|digits| digits.parse::<u16>().ok())
        .and_then(|number| StatusCode::from_u16(number).ok());
    if let Some(status) = code {
        status_error(status, message)
    } else if message.contains("timed out") {
        ChatError::Timeout(message)
    } else {
        ChatError::Connection(message)
    }
}

/// Maps an `async-openai` failure to a [`ChatError`].
#[must_use]
pub fn chat_error(failure: OpenAIError) -> ChatError {
    match failure {
        OpenAIError::Reqwest(error) => transport_error(&error),
        OpenAIError::ApiError(error) => api_error(&error),
        OpenAIError::JSONDeserialize(error) => ChatError::Decode(error.to_string()),
        OpenAIError::StreamError(message) => stream_error(message),
        OpenAIError::InvalidArgument(message) => ChatError::InvalidRequest(message),
        other => ChatError::Connection(other.to_string()),
    }
}

fn wire_tool_call(call: &ToolCall) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: call.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
    }
}

fn wire_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone().unwrap_or_default();
    match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::System),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::User),
        ChatRole::Assistant => {
            let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = &message.content {
                builder.content(text.as_str());
            }
            if !message.tool_calls.is_empty() {
                builder.tool_calls(message.tool_calls.iter().map(wire_tool_call).collect::<Vec<_>>());
            }
            builder.build().map(ChatCompletionRequestMessage::Assistant)
        }
    }
}

/// Builds the streaming request body for `request`.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] when a history entry cannot be
/// expressed as a chat-completions message.
pub fn wire_request(request: &ChatRequest) -> Result<CreateChatCompletionRequest, ChatError> {
    let invalid = |error: OpenAIError| ChatError::InvalidRequest(error.to_string());
    let messages = request
        .messages
        .iter()
        .map(wire_message)
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;
    CreateChatCompletionRequestArgs::default()
        .model(request.model.as_str())
        .messages(messages)
        .stream(true)
        .build()
        .map_err(invalid)
}

#[async_trait]
impl ChatCompletions for HttpChatClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChunkStream, ChatError> {
        tracing::debug!(url = %self.url, model = %request.model, turns = request.messages.len(), "starting completion");
        let body = wire_request(&request)?;
        let mut chunks = self
            .client
            .chat()
            .create_stream(body)
            .await
            .map_err(chat_error)?;

        // A refused request surfaces as the first stream item.
        let first = match chunks.next().await {
            None => return Ok(Box::pin(stream::empty())),
            Some(Ok(chunk)) => chunk,
            Some(Err(failure)) => {
                let error = chat_error(failure);
                tracing::warn!(url = %self.url, %error, "completion request refused");
                return Err(error);
            }
        };
        Ok(Box::pin(async_stream::stream! {
            yield Ok(first);
            while let Some(item) = chunks.next().await {
                match item {
                    Ok(chunk) => yield Ok(chunk),
                    Err(error) => {
                        yield Err(chat_error(error));
                        return;
                    }
                }
            }
        }))
    }
}

/// Builds an [`HttpChatClient`] per endpoint with a shared deadline.
#[derive(Debug, Clone, Copy)]
pub struct HttpChatClientFactory {
    timeout: Duration,
}

impl Default for HttpChatClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl HttpChatClientFactory {
    /// Creates a factory whose clients time out after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ChatClientFactory for HttpChatClientFactory {
    fn connect(&self, endpoint: &ChatEndpoint) -> Result<Arc<dyn ChatCompletions>, ChatError> {
        Ok(Arc::new(HttpChatClient::new(endpoint, self.timeout)?))
    }
}
