//! Agent backed by an OpenAI-compatible chat-completions endpoint.

use crate::agent::domain::{AgentName, AgentState, AgentStateCell};
use crate::agent::ports::{Agent, MessageStream, ProviderError, ProviderResult};
use crate::message::domain::Message;
use crate::openai::domain::{
    AssistantTurn, ChatMessage, ChatRequest, ResponseAccumulator, build_messages,
};
use crate::openai::ports::{ChatCompletions, ChatError};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Agent type tag reported by OpenAI-compatible agents.
pub const OPENAI_AGENT_TYPE: &str = "api";

/// A stateful chat agent.
///
/// Keeps the whole conversation, system prompt first, and replays it on
/// every call. A failed call leaves the history as it was before the call.
pub struct OpenAiAgent<C>
where
    C: Clock + Send + Sync,
{
    name: AgentName,
    model: String,
    client: Arc<dyn ChatCompletions>,
    clock: Arc<C>,
    state: AgentStateCell,
    history: Mutex<Vec<ChatMessage>>,
}

impl<C> OpenAiAgent<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an idle agent seeded with an optional system prompt.
    #[must_use]
    pub fn new(
        name: AgentName,
        model: impl Into<String>,
        instructions: Option<&str>,
        client: Arc<dyn ChatCompletions>,
        clock: Arc<C>,
    ) -> Self {
        let history = instructions
            .map(ChatMessage::system)
            .into_iter()
            .collect();
        Self {
            name,
            model: model.into(),
            client,
            clock,
            state: AgentStateCell::new(),
            history: Mutex::new(history),
        }
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns a copy of the conversation history.
    #[must_use]
    pub fn history(&self) -> Vec<ChatMessage> {
        self.lock_history().clone()
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn complete(&self, request: ChatRequest) -> Result<AssistantTurn, ChatError> {
        let mut chunks = self.client.stream_chat(request).await?;
        let mut accumulator = ResponseAccumulator::new();
        while let Some(chunk) = chunks.next().await {
            accumulator.push(&chunk?);
        }
        Ok(accumulator.finish())
    }
}

#[async_trait]
impl<C> Agent for OpenAiAgent<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn name(&self) -> &AgentName {
        &self.name
    }

    fn agent_type(&self) -> &str {
        OPENAI_AGENT_TYPE
    }

    fn state(&self) -> AgentState {
        self.state.get()
    }

    fn handle_message(&self, message: Message) -> MessageStream<'_> {
        let guard = match self.state.begin() {
            Ok(guard) => guard,
            Err(state) => {
                tracing::warn!(agent = %self.name, %state, "message rejected");
                return Box::pin(stream::iter([Err(ProviderError::NotReady {
                    agent: self.name.clone(),
                    state,
                })]));
            }
        };
        Box::pin(async_stream::stream! {
            let (request, checkpoint) = {
                let mut history = self.lock_history();
                let checkpoint = history.len();
                history.push(ChatMessage::user(message.content()));
                (ChatRequest::new(self.model.as_str(), history.clone()), checkpoint)
            };
            match self.complete(request).await {
                Ok(turn) => {
                    self.lock_history().push(turn.to_history());
                    let replies = build_messages(&turn, &self.name, &self.model, &*self.clock);
                    tracing::debug!(
                        agent = %self.name,
                        replies = replies.len(),
                        tool_calls = turn.tool_calls.len(),
                        "completion finished"
                    );
                    for reply in replies {
                        yield Ok(reply);
                    }
                    guard.succeed();
                }
                Err(error) => {
                    self.lock_history().truncate(checkpoint);
                    tracing::warn!(agent = %self.name, %error, "completion failed");
                    guard.fail();
                    yield Err(ProviderError::from(error));
                }
            }
        })
    }

    async fn shutdown(&self) -> ProviderResult<()> {
        self.lock_history().clear();
        self.state.terminate();
        tracing::info!(agent = %self.name, "chat agent shut down");
        Ok(())
    }
}
