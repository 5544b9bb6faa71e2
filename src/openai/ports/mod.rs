//! Port definitions for the OpenAI-compatible backend.

mod completions;
mod error;

#[cfg(test)]
pub use completions::MockChatCompletions;
pub use completions::{ChatClientFactory, ChatCompletions, ChatEndpoint, ChunkStream};
pub use error::ChatError;
