//! Agent backed by the coding-agent CLI.

use super::{RecoveryController, SessionItem};
use crate::agent::domain::{AgentName, AgentState, AgentStateCell, ProcessingGuard};
use crate::agent::ports::{Agent, MessageStream, ProviderError, ProviderResult};
use crate::message::domain::Message;
use crate::sdk::domain::{ExecutionMode, SdkOptions, translate_event};
use crate::sdk::ports::{SdkTransport, SessionConnection};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Agent type tag reported by SDK agents.
pub const SDK_AGENT_TYPE: &str = "sdk";

/// An agent driving the coding-agent backend in one-shot or session mode.
///
/// One-shot mode launches a fresh execution per message and keeps nothing
/// between calls. Session mode opens one connection on the first message and
/// reuses it until [`Agent::shutdown`], with stream-level rate-limit
/// recovery.
pub struct SdkAgent<T, C>
where
    T: SdkTransport,
    C: Clock + Send + Sync,
{
    name: AgentName,
    options: SdkOptions,
    mode: ExecutionMode,
    transport: Arc<T>,
    clock: Arc<C>,
    recovery: RecoveryController,
    state: AgentStateCell,
    session: Mutex<Option<Box<dyn SessionConnection>>>,
}

impl<T, C> SdkAgent<T, C>
where
    T: SdkTransport,
    C: Clock + Send + Sync,
{
    /// Creates an idle agent. No backend work happens until the first
    /// message.
    #[must_use]
    pub fn new(
        name: AgentName,
        options: SdkOptions,
        mode: ExecutionMode,
        transport: Arc<T>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            name,
            options,
            mode,
            transport,
            clock,
            recovery: RecoveryController::default(),
            state: AgentStateCell::new(),
            session: Mutex::new(None),
        }
    }

    /// Replaces the session recovery policy.
    #[must_use]
    pub const fn with_recovery(mut self, recovery: RecoveryController) -> Self {
        self.recovery = recovery;
        self
    }

    /// Returns the execution mode.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Returns the backend options.
    #[must_use]
    pub const fn options(&self) -> &SdkOptions {
        &self.options
    }

    fn terminated(&self) -> bool {
        self.state.get() == AgentState::Terminated
    }

    fn one_shot<'a>(&'a self, guard: ProcessingGuard<'a>, message: Message) -> MessageStream<'a> {
        Box::pin(async_stream::stream! {
            let mut events = self.transport.query(&self.options, message.content());
            while let Some(item) = events.next().await {
                if self.terminated() {
                    tracing::debug!(agent = %self.name, "agent terminated; abandoning execution");
                    return;
                }
                match item {
                    Ok(event) => {
                        for translated in translate_event(&event, &self.name, &*self.clock) {
                            yield Ok(translated);
                        }
                    }
                    Err(error) => {
                        tracing::warn!(agent = %self.name, %error, "one-shot execution failed");
                        guard.fail();
                        yield Err(ProviderError::from(error));
                        return;
                    }
                }
            }
            guard.succeed();
        })
    }

    /// Takes the parked session connection, opening one on first use.
    ///
    /// The slot lock is held only while the connection moves in or out, so
    /// [`Agent::shutdown`] never waits behind a response in flight.
    async fn checkout(&self) -> ProviderResult<Box<dyn SessionConnection>> {
        if let Some(connection) = self.session.lock().await.take() {
            return Ok(connection);
        }
        let connection = self.transport.connect(&self.options).await.map_err(|error| {
            tracing::warn!(agent = %self.name, %error, "session failed to open");
            ProviderError::from(error)
        })?;
        tracing::info!(agent = %self.name, "session opened");
        Ok(connection)
    }

    /// Parks the connection for the next message, or closes it when the
    /// agent was shut down while the response streamed.
    async fn check_in(&self, mut connection: Box<dyn SessionConnection>) {
        {
            let mut slot = self.session.lock().await;
            if !self.terminated() {
                *slot = Some(connection);
                return;
            }
        }
        self.close(connection.as_mut()).await;
    }

    async fn close(&self, connection: &mut dyn SessionConnection) {
        match connection.disconnect().await {
            Ok(()) => tracing::info!(agent = %self.name, "session closed"),
            Err(error) => {
                tracing::warn!(agent = %self.name, %error, "session disconnect failed; ignoring");
            }
        }
    }

    fn session<'a>(&'a self, guard: ProcessingGuard<'a>, message: Message) -> MessageStream<'a> {
        Box::pin(async_stream::stream! {
            let mut connection = match self.checkout().await {
                Ok(connection) => connection,
                Err(error) => {
                    guard.fail();
                    yield Err(error);
                    return;
                }
            };

            let mut failure = None;
            if let Err(error) = connection.send(message.content()).await {
                tracing::warn!(agent = %self.name, %error, "failed to send prompt");
                failure = Some(ProviderError::from(error));
            } else {
                let mut items = self.recovery.consume(connection.as_mut());
                while let Some(item) = items.next().await {
                    if self.terminated() {
                        tracing::debug!(agent = %self.name, "agent terminated; abandoning response");
                        break;
                    }
                    match item {
                        Ok(SessionItem::Event(event)) => {
                            self.state.transition(AgentState::Processing);
                            for translated in translate_event(&event, &self.name, &*self.clock) {
                                yield Ok(translated);
                            }
                        }
                        Ok(SessionItem::Restarted { attempt }) => {
                            tracing::debug!(agent = %self.name, attempt, "session stream restarted");
                            self.state.transition(AgentState::Restarting);
                        }
                        Err(error) => {
                            tracing::warn!(agent = %self.name, %error, "session response failed");
                            failure = Some(ProviderError::from(error));
                            break;
                        }
                    }
                }
            }
            self.check_in(connection).await;

            if self.terminated() {
                return;
            }
            if let Some(error) = failure {
                guard.fail();
                yield Err(error);
            } else {
                self.state.transition(AgentState::Processing);
                guard.succeed();
            }
        })
    }
}

#[async_trait]
impl<T, C> Agent for SdkAgent<T, C>
where
    T: SdkTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn name(&self) -> &AgentName {
        &self.name
    }

    fn agent_type(&self) -> &str {
        SDK_AGENT_TYPE
    }

    fn state(&self) -> AgentState {
        self.state.get()
    }

    fn handle_message(&self, message: Message) -> MessageStream<'_> {
        let guard = match self.state.begin() {
            Ok(guard) => guard,
            Err(state) => {
                tracing::warn!(agent = %self.name, %state, "message rejected");
                return Box::pin(stream::iter([Err(ProviderError::NotReady {
                    agent: self.name.clone(),
                    state,
                })]));
            }
        };
        match self.mode {
            ExecutionMode::OneShot => self.one_shot(guard, message),
            ExecutionMode::Session => self.session(guard, message),
        }
    }

    async fn shutdown(&self) -> ProviderResult<()> {
        self.state.terminate();
        let connection = self.session.lock().await.take();
        if let Some(mut connection) = connection {
            self.close(connection.as_mut()).await;
        }
        Ok(())
    }
}
