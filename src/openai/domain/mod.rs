//! Conversation model, stream reassembly and endpoint resolution.

mod accumulator;
mod auth;
mod chat;
mod profile;
mod translation;

pub use accumulator::{AssistantTurn, ResponseAccumulator};
pub use auth::{ApiKeyStrategy, FALLBACK_API_KEY_ENV, NOT_NEEDED};
pub use chat::{ChatMessage, ChatRequest, ChatRole, ToolCall};
pub use profile::ProviderProfile;
pub use translation::{OPENAI_PROVIDER_TAG, build_messages};
