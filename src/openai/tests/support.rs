//! Test doubles for chat-completions clients.

use crate::agent::domain::{AgentConfig, AgentName};
use crate::openai::domain::ChatRequest;
use crate::openai::ports::{
    ChatClientFactory, ChatCompletions, ChatEndpoint, ChatError, ChunkStream, MockChatCompletions,
};
use async_openai::types::CreateChatCompletionStreamResponse;
use futures::stream;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub fn name(raw: &str) -> AgentName {
    AgentName::new(raw).expect("valid agent name")
}

pub fn openai_config(agent: &str) -> AgentConfig {
    AgentConfig::new(name(agent), "openai")
        .expect("valid config")
        .with_model("gpt-4o")
}

pub type Chunk = CreateChatCompletionStreamResponse;

pub fn chunks(items: Vec<Result<Chunk, ChatError>>) -> ChunkStream {
    Box::pin(stream::iter(items))
}

fn chunk(delta: Value) -> Chunk {
    serde_json::from_value(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "created": 0,
        "model": "gpt-4o",
        "choices": [{"index": 0, "delta": delta, "finish_reason": null}]
    }))
    .expect("fixture chunk decodes")
}

pub fn text_chunk(content: &str) -> Chunk {
    chunk(json!({"content": content}))
}

pub fn tool_call_chunk(index: u32, id: &str, name: &str, arguments: &str) -> Chunk {
    chunk(json!({"tool_calls": [{
        "index": index,
        "id": id,
        "type": "function",
        "function": {"name": name, "arguments": arguments}
    }]}))
}

/// Mock client that records requests and answers from `replies` in order.
pub fn recording_client(
    replies: Vec<Result<Vec<Result<Chunk, ChatError>>, ChatError>>,
) -> (MockChatCompletions, Arc<Mutex<Vec<ChatRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let mut queue = replies.into_iter();
    let mut client = MockChatCompletions::new();
    client.expect_stream_chat().returning(move |request| {
        seen.lock().expect("request log lock").push(request);
        queue
            .next()
            .unwrap_or_else(|| Ok(vec![Ok(text_chunk("default"))]))
            .map(chunks)
    });
    (client, requests)
}

/// Factory handing out one shared client and recording endpoints.
#[derive(Default)]
pub struct RecordingFactory {
    pub endpoints: Mutex<Vec<ChatEndpoint>>,
}

impl ChatClientFactory for RecordingFactory {
    fn connect(&self, endpoint: &ChatEndpoint) -> Result<Arc<dyn ChatCompletions>, ChatError> {
        self.endpoints
            .lock()
            .expect("endpoint log lock")
            .push(endpoint.clone());
        let (client, _) = recording_client(Vec::new());
        Ok(Arc::new(client))
    }
}
