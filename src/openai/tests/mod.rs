//! Unit tests for the OpenAI-compatible provider.

mod support;
