//! Agent and provider services for OpenAI-compatible endpoints.

mod agent;
mod provider;

pub use agent::{OPENAI_AGENT_TYPE, OpenAiAgent};
pub use provider::{EnvLookup, OPENAI_PROVIDER_KEY, OpenAiProvider};
