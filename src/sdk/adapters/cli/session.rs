//! Persistent CLI session.

use super::{collect_output, decode_line, exit_failure};
use crate::sdk::ports::{SdkEventStream, SessionConnection, TransportError};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::task::JoinHandle;

/// One long-lived CLI process in `stream-json` input mode.
pub(super) struct CliSession {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Lines<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
    disconnect_timeout: Duration,
}

impl CliSession {
    pub(super) fn new(
        child: Child,
        stdin: ChildStdin,
        stdout: ChildStdout,
        stderr: JoinHandle<String>,
        disconnect_timeout: Duration,
    ) -> Self {
        Self {
            child,
            stdin: Some(stdin),
            lines: BufReader::new(stdout).lines(),
            stderr: Some(stderr),
            disconnect_timeout,
        }
    }

    async fn closed_early(&mut self) -> TransportError {
        let stderr = self
            .stderr
            .take()
            .unwrap_or_else(|| collect_output::<ChildStdout>(None));
        exit_failure(&mut self.child, stderr)
            .await
            .unwrap_or_else(|| {
                TransportError::connection("CLI closed its output before the response completed")
            })
    }
}

#[async_trait]
impl SessionConnection for CliSession {
    async fn send(&mut self, prompt: &str) -> Result<(), TransportError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| TransportError::connection("session is disconnected"))?;
        let payload = json!({
            "type": "user",
            "message": {"role": "user", "content": prompt},
            "parent_tool_use_id": null,
            "session_id": "default",
        });
        let mut line = payload.to_string();
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|err| TransportError::connection(format!("failed to write prompt: {err}")))?;
        stdin
            .flush()
            .await
            .map_err(|err| TransportError::connection(format!("failed to flush prompt: {err}")))
    }

    fn receive(&mut self) -> SdkEventStream<'_> {
        Box::pin(async_stream::stream! {
            loop {
                match self.lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match decode_line(&line) {
                        Ok(event) => {
                            let finished = event.is_result();
                            yield Ok(event);
                            if finished {
                                return;
                            }
                        }
                        Err(error) => {
                            yield Err(error);
                            return;
                        }
                    },
                    Ok(None) => {
                        yield Err(self.closed_early().await);
                        return;
                    }
                    Err(err) => {
                        yield Err(TransportError::connection(format!(
                            "failed to read CLI output: {err}"
                        )));
                        return;
                    }
                }
            }
        })
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        drop(self.stdin.take());
        match tokio::time::timeout(self.disconnect_timeout, self.child.wait()).await {
            Ok(Ok(_status)) => Ok(()),
            Ok(Err(err)) => Err(TransportError::connection(format!(
                "failed to wait for CLI: {err}"
            ))),
            Err(_elapsed) => {
                tracing::warn!(
                    timeout_secs = self.disconnect_timeout.as_secs(),
                    "CLI did not exit after stdin closed; killing"
                );
                self.child
                    .kill()
                    .await
                    .map_err(|err| TransportError::connection(format!("failed to kill CLI: {err}")))
            }
        }
    }
}
