//! Step definitions and world for session recovery scenarios.

use futures::StreamExt;
use maestro::agent::{
    domain::{AgentConfig, AgentName, AgentState, credential_keys},
    ports::{Agent, AgentProvider, ProviderError},
};
use maestro::message::domain::Message;
use maestro::sdk::{
    adapters::memory::{ScriptStep, ScriptedTransport},
    domain::SdkEvent,
    ports::TransportError,
    services::SdkProvider,
};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, then, when};
use std::sync::Arc;

/// Scenario world for session recovery behaviour tests.
#[derive(Default)]
pub struct SessionWorld {
    /// Session agent under test.
    pub agent: Option<Arc<dyn Agent>>,
    /// Every item produced by the last message.
    pub results: Vec<Result<Message, ProviderError>>,
}

impl SessionWorld {
    fn agent(&self) -> Result<&Arc<dyn Agent>, eyre::Report> {
        self.agent
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no agent in scenario world"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SessionWorld {
    SessionWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[given("a session agent whose backend signals a rate limit {count:u32} times before answering")]
fn session_agent_with_signals(world: &mut SessionWorld, count: u32) -> Result<(), eyre::Report> {
    let mut steps: Vec<ScriptStep> = (0..count)
        .map(|_| {
            ScriptStep::Fail(TransportError::message_parse(
                "Unknown message type: rate_limit_event",
            ))
        })
        .collect();
    steps.push(ScriptStep::Event(SdkEvent::assistant_text("recovered")));
    steps.push(ScriptStep::Event(SdkEvent::success("", "done")));
    let transport = ScriptedTransport::new().with_turn(steps);
    let provider = SdkProvider::new(Arc::new(transport), Arc::new(DefaultClock));
    let name = AgentName::new("reviewer").map_err(|err| eyre::eyre!("{err}"))?;
    let config = AgentConfig::new(name, "sdk")
        .map_err(|err| eyre::eyre!("{err}"))?
        .with_credential(credential_keys::MODE, "client");
    let agent = run_async(provider.create_agent(&config))
        .map_err(|err| eyre::eyre!("agent creation failed: {err}"))?;
    world.agent = Some(agent);
    Ok(())
}

#[when(r#"the agent is asked "{prompt}""#)]
fn agent_is_asked(world: &mut SessionWorld, prompt: String) -> Result<(), eyre::Report> {
    let agent = Arc::clone(world.agent()?);
    let message = Message::builder("human")
        .to("reviewer")
        .with_content(prompt)
        .build(&DefaultClock)
        .map_err(|err| eyre::eyre!("invalid message: {err}"))?;
    world.results = run_async(agent.handle_message(message).collect());
    Ok(())
}

#[then(r#"the agent replies "{content}""#)]
fn agent_replies(world: &SessionWorld, content: String) -> Result<(), eyre::Report> {
    let mut replies = Vec::new();
    for result in &world.results {
        match result {
            Ok(reply) => replies.push(reply.content()),
            Err(err) => return Err(eyre::eyre!("unexpected failure: {err}")),
        }
    }
    if !replies.contains(&content.as_str()) {
        return Err(eyre::eyre!("expected a reply '{content}', got {replies:?}"));
    }
    Ok(())
}

#[then("the message fails with status {status:i32}")]
fn message_fails_with_status(world: &SessionWorld, status: i32) -> Result<(), eyre::Report> {
    match world.results.last() {
        Some(Err(err)) if err.status_code() == Some(status) => Ok(()),
        other => Err(eyre::eyre!("expected a {status} failure, got {other:?}")),
    }
}

#[then(r#"the agent ends up "{state}""#)]
fn agent_ends_up(world: &SessionWorld, state: String) -> Result<(), eyre::Report> {
    let expected = AgentState::try_from(state.as_str()).map_err(|err| eyre::eyre!("{err}"))?;
    let actual = world.agent()?.state();
    if actual != expected {
        return Err(eyre::eyre!("expected state {expected}, found {actual}"));
    }
    Ok(())
}
