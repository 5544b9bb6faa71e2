//! Test doubles for agents and providers.

use crate::agent::{
    domain::{AgentConfig, AgentName, AgentState, AgentStateCell},
    ports::{Agent, AgentProvider, MessageStream, ProviderError, ProviderResult},
};
use crate::message::domain::{Message, MessageKind, MessageMetadata};
use async_trait::async_trait;
use futures::stream;
use mockable::DefaultClock;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Agent that echoes message content and can be told to fail or stall
/// shutdown.
pub struct EchoAgent {
    name: AgentName,
    state: AgentStateCell,
    fail_shutdown: bool,
    shutdown_delay: Option<Duration>,
}

#[async_trait]
impl Agent for EchoAgent {
    fn name(&self) -> &AgentName {
        &self.name
    }

    fn agent_type(&self) -> &str {
        "echo"
    }

    fn state(&self) -> AgentState {
        self.state.get()
    }

    fn handle_message(&self, message: Message) -> MessageStream<'_> {
        let guard = match self.state.begin() {
            Ok(guard) => guard,
            Err(state) => {
                return Box::pin(stream::once(async move {
                    Err(ProviderError::NotReady {
                        agent: self.name.clone(),
                        state,
                    })
                }));
            }
        };
        let reply = Message::broadcast(
            &self.name,
            MessageKind::Chat,
            message.content(),
            MessageMetadata::new(),
            &DefaultClock,
        );
        guard.succeed();
        Box::pin(stream::iter([Ok(reply)]))
    }

    async fn shutdown(&self) -> ProviderResult<()> {
        self.state.terminate();
        if let Some(delay) = self.shutdown_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_shutdown {
            Err(ProviderError::Generic("backend hung up".to_owned()))
        } else {
            Ok(())
        }
    }
}

/// Provider building [`EchoAgent`]s.
#[derive(Default)]
pub struct EchoProvider {
    failing_shutdowns: HashSet<String>,
    fail_create: bool,
    create_delay: Option<Duration>,
    shutdown_delay: Option<Duration>,
    pub created: AtomicUsize,
}

impl EchoProvider {
    pub fn failing_shutdown_for(mut self, name: &str) -> Self {
        self.failing_shutdowns.insert(name.to_owned());
        self
    }

    pub const fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub const fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    pub const fn with_shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = Some(delay);
        self
    }
}

#[async_trait]
impl AgentProvider for EchoProvider {
    fn provider_type(&self) -> &str {
        "echo"
    }

    async fn create_agent(&self, config: &AgentConfig) -> ProviderResult<Arc<dyn Agent>> {
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_create {
            return Err(ProviderError::Auth("no credentials".to_owned()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EchoAgent {
            name: config.name().clone(),
            state: AgentStateCell::new(),
            fail_shutdown: self.failing_shutdowns.contains(config.name().as_str()),
            shutdown_delay: self.shutdown_delay,
        }))
    }

    async fn validate_credentials(&self) -> bool {
        !self.fail_create
    }
}

pub fn name(value: &str) -> AgentName {
    AgentName::new(value).expect("valid agent name")
}

pub fn echo_config(value: &str) -> AgentConfig {
    AgentConfig::new(name(value), "echo").expect("valid config")
}
