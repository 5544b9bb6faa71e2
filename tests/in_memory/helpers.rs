//! Shared test helpers for in-memory orchestration tests.

use futures::StreamExt;
use maestro::agent::{
    domain::{AgentConfig, AgentName, credential_keys},
    ports::{Agent, ProviderError},
    services::{AgentRegistry, ProviderCatalog},
};
use maestro::message::domain::Message;
use maestro::sdk::{adapters::memory::ScriptedTransport, services::SdkProvider};
use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Boxed error used by test bodies.
pub type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a scripted transport that echoes prompts.
#[fixture]
pub fn transport() -> ScriptedTransport {
    ScriptedTransport::new()
}

/// Builds a registry whose `sdk` provider plays `transport`.
#[must_use]
pub fn registry_over(transport: &ScriptedTransport) -> AgentRegistry {
    let provider = SdkProvider::new(Arc::new(transport.clone()), Arc::new(DefaultClock));
    AgentRegistry::new(ProviderCatalog::new().with_provider(Arc::new(provider)))
}

/// Builds an SDK agent configuration, optionally in session mode.
///
/// # Errors
///
/// Returns an error if the name is invalid.
pub fn sdk_config(name: &str, session: bool) -> Result<AgentConfig, Box<dyn std::error::Error + Send + Sync>> {
    let config = AgentConfig::new(AgentName::new(name)?, "sdk")?;
    Ok(if session {
        config.with_credential(credential_keys::MODE, "client")
    } else {
        config
    })
}

/// Builds a task message from `human` to `recipient`.
///
/// # Errors
///
/// Returns an error if the message is invalid.
pub fn task(recipient: &str, content: &str) -> Result<Message, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Message::builder("human")
        .to(recipient)
        .with_content(content)
        .build(&DefaultClock)?)
}

/// Sends `message` to `agent` and collects every reply.
pub async fn ask(agent: &dyn Agent, message: Message) -> Vec<Result<Message, ProviderError>> {
    agent.handle_message(message).collect().await
}
