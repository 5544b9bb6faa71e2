//! Scripted in-memory transport.
//!
//! Plays back pre-recorded response cycles instead of launching a backend.
//! Every one-shot query gets a fresh session identifier; a session keeps one
//! identifier for all of its cycles.

use crate::sdk::domain::{SdkEvent, SdkOptions};
use crate::sdk::ports::{SdkEventStream, SdkTransport, SessionConnection, TransportError};
use async_trait::async_trait;
use futures::future;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// One scripted step of a response cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Emit a native event.
    Event(SdkEvent),
    /// Fail the current read with this error.
    Fail(TransportError),
    /// Never finish the current read, like a backend that hangs.
    Stall,
}

#[derive(Debug, Default)]
struct ScriptState {
    turns: VecDeque<Vec<ScriptStep>>,
    prompts: Vec<String>,
    queries: usize,
    connects: usize,
    disconnects: usize,
    connect_error: Option<TransportError>,
    disconnect_error: Option<TransportError>,
    unavailable: bool,
}

impl ScriptState {
    /// Takes the next scripted cycle, or an echo of `prompt` when the script
    /// is exhausted.
    fn next_turn(&mut self, prompt: &str) -> Vec<ScriptStep> {
        self.prompts.push(prompt.to_owned());
        self.turns.pop_front().unwrap_or_else(|| {
            vec![
                ScriptStep::Event(SdkEvent::assistant_text(format!("ack: {prompt}"))),
                ScriptStep::Event(SdkEvent::success("", "done")),
            ]
        })
    }
}

fn lock(state: &Mutex<ScriptState>) -> MutexGuard<'_, ScriptState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stamps `session_id` onto result events.
fn stamp(step: ScriptStep, session_id: &str) -> ScriptStep {
    match step {
        ScriptStep::Event(SdkEvent::Result(mut result)) => {
            result.session_id = session_id.to_owned();
            ScriptStep::Event(SdkEvent::Result(result))
        }
        other => other,
    }
}

/// Transport that replays scripted response cycles.
///
/// Clones share the same script and counters.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    /// Creates a transport that echoes every prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one scripted response cycle.
    #[must_use]
    pub fn with_turn(self, steps: Vec<ScriptStep>) -> Self {
        lock(&self.state).turns.push_back(steps);
        self
    }

    /// Makes every `connect` fail with `error`.
    #[must_use]
    pub fn with_connect_error(self, error: TransportError) -> Self {
        lock(&self.state).connect_error = Some(error);
        self
    }

    /// Makes every `disconnect` fail with `error`.
    #[must_use]
    pub fn with_disconnect_error(self, error: TransportError) -> Self {
        lock(&self.state).disconnect_error = Some(error);
        self
    }

    /// Reports the backend as unavailable.
    #[must_use]
    pub fn unavailable(self) -> Self {
        lock(&self.state).unavailable = true;
        self
    }

    /// Returns the number of one-shot queries started.
    #[must_use]
    pub fn queries(&self) -> usize {
        lock(&self.state).queries
    }

    /// Returns the number of sessions opened.
    #[must_use]
    pub fn connects(&self) -> usize {
        lock(&self.state).connects
    }

    /// Returns the number of sessions closed.
    #[must_use]
    pub fn disconnects(&self) -> usize {
        lock(&self.state).disconnects
    }

    /// Returns every prompt received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.state).prompts.clone()
    }
}

#[async_trait]
impl SdkTransport for ScriptedTransport {
    fn query(&self, _options: &SdkOptions, prompt: &str) -> SdkEventStream<'static> {
        let session_id = Uuid::new_v4().to_string();
        let steps = {
            let mut state = lock(&self.state);
            state.queries += 1;
            state.next_turn(prompt)
        };
        Box::pin(async_stream::stream! {
            for step in steps {
                match stamp(step, &session_id) {
                    ScriptStep::Event(event) => yield Ok(event),
                    ScriptStep::Fail(error) => {
                        yield Err(error);
                        return;
                    }
                    ScriptStep::Stall => future::pending::<()>().await,
                }
            }
        })
    }

    async fn connect(
        &self,
        _options: &SdkOptions,
    ) -> Result<Box<dyn SessionConnection>, TransportError> {
        let mut state = lock(&self.state);
        if let Some(error) = state.connect_error.clone() {
            return Err(error);
        }
        state.connects += 1;
        Ok(Box::new(ScriptedSession {
            state: Arc::clone(&self.state),
            session_id: Uuid::new_v4().to_string(),
            pending: VecDeque::new(),
        }))
    }

    fn is_available(&self) -> bool {
        !lock(&self.state).unavailable
    }
}

/// Session half of [`ScriptedTransport`].
struct ScriptedSession {
    state: Arc<Mutex<ScriptState>>,
    session_id: String,
    pending: VecDeque<ScriptStep>,
}

#[async_trait]
impl SessionConnection for ScriptedSession {
    async fn send(&mut self, prompt: &str) -> Result<(), TransportError> {
        let steps = lock(&self.state).next_turn(prompt);
        self.pending = steps.into_iter().collect();
        Ok(())
    }

    fn receive(&mut self) -> SdkEventStream<'_> {
        Box::pin(async_stream::stream! {
            while let Some(step) = self.pending.pop_front() {
                match stamp(step, &self.session_id) {
                    ScriptStep::Event(event) => {
                        let finished = event.is_result();
                        yield Ok(event);
                        if finished {
                            return;
                        }
                    }
                    ScriptStep::Fail(error) => {
                        yield Err(error);
                        return;
                    }
                    ScriptStep::Stall => future::pending::<()>().await,
                }
            }
        })
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.disconnects += 1;
        state.disconnect_error.clone().map_or(Ok(()), Err)
    }
}
