//! Stream-level recovery for persistent sessions.
//!
//! The backend reports that it is itself absorbing an upstream rate limit by
//! emitting an event type the decoder does not know. That surfaces as a
//! parse error on an otherwise healthy connection, so recovery resumes
//! reading the same connection instead of rebuilding the session.

use crate::agent::ports::ProviderError;
use crate::sdk::domain::SdkEvent;
use crate::sdk::ports::{SessionConnection, TransportError, TransportErrorKind};
use futures::StreamExt;
use futures::stream::BoxStream;
use thiserror::Error;

/// Marker carried by the backend's rate-limit signal.
const RATE_LIMIT_SIGNAL: &str = "rate_limit_event";

/// Item produced while consuming one response cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionItem {
    /// A native event, in wire order.
    Event(SdkEvent),
    /// Consumption resumed after a transient signal.
    Restarted {
        /// Consecutive restarts so far, starting at 1.
        attempt: u32,
    },
}

/// Failure ending a response cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    /// The transport failed in a way recovery does not handle.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Too many consecutive transient signals.
    #[error("stream recovery gave up after {restarts} consecutive restarts: {last}")]
    Exhausted {
        /// Restarts performed before giving up.
        restarts: u32,
        /// The signal that tripped the breaker.
        last: TransportError,
    },
}

impl From<RecoveryError> for ProviderError {
    fn from(error: RecoveryError) -> Self {
        match error {
            RecoveryError::Transport(inner) => inner.into(),
            exhausted @ RecoveryError::Exhausted { .. } => {
                Self::api(exhausted.to_string(), Some(429))
            }
        }
    }
}

/// Circuit-breaking consumer of session response streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryController {
    max_restarts: u32,
}

impl Default for RecoveryController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RESTARTS)
    }
}

impl RecoveryController {
    /// Default ceiling on consecutive restarts.
    pub const DEFAULT_MAX_RESTARTS: u32 = 10;

    /// Creates a controller allowing `max_restarts` consecutive restarts.
    #[must_use]
    pub const fn new(max_restarts: u32) -> Self {
        Self { max_restarts }
    }

    /// Returns the restart ceiling.
    #[must_use]
    pub const fn max_restarts(self) -> u32 {
        self.max_restarts
    }

    /// Returns whether `error` is the backend's transient rate-limit signal.
    #[must_use]
    pub fn is_transient(error: &TransportError) -> bool {
        error.kind() == TransportErrorKind::MessageParse
            && error.message().contains(RATE_LIMIT_SIGNAL)
    }

    /// Consumes one response cycle from `connection`.
    ///
    /// Transient signals restart consumption of the same connection. The
    /// consecutive counter resets after every good event; exceeding the
    /// ceiling ends the stream with [`RecoveryError::Exhausted`].
    pub fn consume<'a>(
        self,
        connection: &'a mut dyn SessionConnection,
    ) -> BoxStream<'a, Result<SessionItem, RecoveryError>> {
        let max_restarts = self.max_restarts;
        Box::pin(async_stream::stream! {
            let mut consecutive: u32 = 0;
            loop {
                let mut resume = false;
                {
                    let mut events = connection.receive();
                    while let Some(item) = events.next().await {
                        match item {
                            Ok(event) => {
                                consecutive = 0;
                                let finished = event.is_result();
                                yield Ok(SessionItem::Event(event));
                                if finished {
                                    return;
                                }
                            }
                            Err(error) if RecoveryController::is_transient(&error) => {
                                if consecutive >= max_restarts {
                                    tracing::error!(
                                        restarts = consecutive,
                                        %error,
                                        "stream recovery breaker tripped"
                                    );
                                    yield Err(RecoveryError::Exhausted {
                                        restarts: consecutive,
                                        last: error,
                                    });
                                    return;
                                }
                                consecutive += 1;
                                resume = true;
                                break;
                            }
                            Err(error) => {
                                yield Err(RecoveryError::Transport(error));
                                return;
                            }
                        }
                    }
                }
                if !resume {
                    return;
                }
                tracing::warn!(
                    attempt = consecutive,
                    max = max_restarts,
                    "transient rate-limit signal; resuming session stream"
                );
                yield Ok(SessionItem::Restarted { attempt: consecutive });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::adapters::memory::{ScriptStep, ScriptedTransport};
    use crate::sdk::domain::SdkOptions;
    use crate::sdk::ports::SdkTransport;

    fn rate_limited() -> ScriptStep {
        ScriptStep::Fail(TransportError::message_parse(
            "Unknown message type: rate_limit_event",
        ))
    }

    async fn run(
        controller: RecoveryController,
        steps: Vec<ScriptStep>,
    ) -> Vec<Result<SessionItem, RecoveryError>> {
        let transport = ScriptedTransport::new().with_turn(steps);
        let mut connection = transport
            .connect(&SdkOptions::default())
            .await
            .expect("scripted connect succeeds");
        connection.send("go").await.expect("scripted send succeeds");
        controller.consume(connection.as_mut()).collect().await
    }

    #[test]
    fn only_rate_limit_parse_errors_are_transient() {
        assert!(RecoveryController::is_transient(&TransportError::message_parse(
            "Unknown message type: rate_limit_event"
        )));
        assert!(!RecoveryController::is_transient(&TransportError::message_parse(
            "Unknown message type: other"
        )));
        assert!(!RecoveryController::is_transient(&TransportError::connection(
            "rate_limit_event"
        )));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn resumes_after_transient_signals() {
        let items = run(
            RecoveryController::default(),
            vec![
                rate_limited(),
                rate_limited(),
                rate_limited(),
                ScriptStep::Event(SdkEvent::assistant_text("recovered")),
                ScriptStep::Event(SdkEvent::success("", "done")),
            ],
        )
        .await;

        let restarts = items
            .iter()
            .filter(|item| matches!(item, Ok(SessionItem::Restarted { .. })))
            .count();
        assert_eq!(restarts, 3);
        assert!(items.iter().all(Result::is_ok));
        assert!(matches!(
            items.last(),
            Some(Ok(SessionItem::Event(SdkEvent::Result(_))))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn counter_resets_after_good_event() {
        let mut steps = vec![rate_limited(), rate_limited()];
        steps.push(ScriptStep::Event(SdkEvent::assistant_text("progress")));
        steps.extend([rate_limited(), rate_limited()]);
        steps.push(ScriptStep::Event(SdkEvent::success("", "done")));

        let items = run(RecoveryController::new(2), steps).await;

        assert!(items.iter().all(Result::is_ok));
        let attempts: Vec<u32> = items
            .iter()
            .filter_map(|item| match item {
                Ok(SessionItem::Restarted { attempt }) => Some(*attempt),
                _ => None,
            })
            .collect();
        assert_eq!(attempts, [1, 2, 1, 2]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn trips_breaker_past_ceiling() {
        let steps = (0..11).map(|_| rate_limited()).collect();

        let items = run(RecoveryController::new(10), steps).await;

        let Some(Err(error)) = items.last() else {
            panic!("expected a terminal error");
        };
        assert!(matches!(error, RecoveryError::Exhausted { restarts: 10, .. }));
        assert_eq!(
            ProviderError::from(error.clone()).status_code(),
            Some(429)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn other_errors_are_fatal() {
        let items = run(
            RecoveryController::default(),
            vec![
                ScriptStep::Fail(TransportError::process("crashed", Some(1))),
                ScriptStep::Event(SdkEvent::success("", "unreachable")),
            ],
        )
        .await;

        assert_eq!(
            items,
            vec![Err(RecoveryError::Transport(TransportError::process(
                "crashed",
                Some(1)
            )))]
        );
    }
}
