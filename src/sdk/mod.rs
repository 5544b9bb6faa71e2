//! Provider for the coding-agent CLI backend (`"sdk"`).
//!
//! Agents run either one-shot, launching a fresh execution per message, or
//! as a persistent session selected with the `mode` credential. The backend
//! is reached through [`ports::SdkTransport`]; [`adapters::cli`] drives the
//! real CLI and [`adapters::memory`] replays scripted responses.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use maestro::agent::domain::{AgentConfig, AgentName};
//! use maestro::agent::ports::AgentProvider;
//! use maestro::message::domain::Message;
//! use maestro::sdk::adapters::memory::ScriptedTransport;
//! use maestro::sdk::services::SdkProvider;
//! use mockable::DefaultClock;
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let provider = SdkProvider::new(Arc::new(ScriptedTransport::new()), Arc::new(DefaultClock));
//! let config = AgentConfig::new(AgentName::new("coder").expect("name"), "sdk").expect("config");
//! let agent = provider.create_agent(&config).await.expect("agent");
//!
//! let task = Message::builder("human").to("coder").with_content("hi").build(&DefaultClock).expect("message");
//! let replies: Vec<_> = agent.handle_message(task).collect().await;
//! assert_eq!(replies.len(), 2);
//! # });
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
