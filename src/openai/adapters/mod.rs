//! Adapters for OpenAI-compatible endpoints.

pub mod http;
