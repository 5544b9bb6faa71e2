//! Port contracts for agents and their providers.
//!
//! Concrete backends live in [`crate::sdk`] and [`crate::openai`].

mod agent;
mod error;

pub use agent::{Agent, AgentProvider, MessageStream};
pub use error::{ProviderError, ProviderResult};
