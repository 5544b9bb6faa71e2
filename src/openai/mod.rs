//! Provider for OpenAI-compatible chat-completions endpoints (`"openai"`).
//!
//! Agents keep their conversation history and stream each completion over
//! server-sent events. Endpoints are chosen per agent from the `base_url`
//! credential or a built-in [`domain::ProviderProfile`], so OpenRouter,
//! Gemini's compatibility layer and local servers share one provider.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
