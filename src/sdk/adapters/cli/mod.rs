//! Subprocess transport driving the coding-agent CLI.
//!
//! One-shot queries run `--print` to completion. Sessions keep one process
//! alive and exchange `stream-json` lines over stdin and stdout.

mod command;
mod decode;
mod session;

pub use decode::decode_line;

use crate::sdk::domain::SdkOptions;
use crate::sdk::ports::{SdkEventStream, SdkTransport, SessionConnection, TransportError};
use async_trait::async_trait;
use session::CliSession;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;

/// Default grace period for a session process to exit after stdin closes.
pub const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport launching the CLI as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliTransport {
    cli_path: PathBuf,
    disconnect_timeout: Duration,
}

impl CliTransport {
    /// Creates a transport for the executable at `cli_path`.
    ///
    /// A bare name is resolved against `PATH` at launch.
    #[must_use]
    pub fn new(cli_path: impl Into<PathBuf>) -> Self {
        Self {
            cli_path: cli_path.into(),
            disconnect_timeout: DEFAULT_DISCONNECT_TIMEOUT,
        }
    }

    /// Sets how long `disconnect` waits before killing the process.
    #[must_use]
    pub const fn with_disconnect_timeout(mut self, timeout: Duration) -> Self {
        self.disconnect_timeout = timeout;
        self
    }

    /// Returns the configured executable path.
    #[must_use]
    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }
}

fn launch_error(cli_path: &Path, error: &io::Error) -> TransportError {
    if error.kind() == io::ErrorKind::NotFound {
        TransportError::cli_not_found(format!("CLI not found at {}", cli_path.display()))
    } else {
        TransportError::connection(format!(
            "failed to start {}: {error}",
            cli_path.display()
        ))
    }
}

/// Drains a pipe in the background so the child never blocks on it.
fn collect_output<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = String::new();
        let Some(mut pipe) = pipe else {
            return buffer;
        };
        if let Err(err) = pipe.read_to_string(&mut buffer).await {
            tracing::debug!(error = %err, "failed to read CLI stderr");
        }
        buffer
    })
}

async fn exit_failure(child: &mut Child, stderr: JoinHandle<String>) -> Option<TransportError> {
    let status = match child.wait().await {
        Ok(status) => status,
        Err(err) => {
            return Some(TransportError::connection(format!(
                "failed to wait for CLI: {err}"
            )));
        }
    };
    if status.success() {
        return None;
    }
    let stderr = stderr.await.unwrap_or_default();
    let code = status.code();
    let mut message = code.map_or_else(
        || "Command terminated by signal".to_owned(),
        |code| format!("Command failed with exit code {code}"),
    );
    if !stderr.trim().is_empty() {
        message.push_str(": ");
        message.push_str(stderr.trim());
    }
    Some(TransportError::process(message, code))
}

#[async_trait]
impl SdkTransport for CliTransport {
    fn query(&self, options: &SdkOptions, prompt: &str) -> SdkEventStream<'static> {
        let cli_path = self.cli_path.clone();
        let mut command = command::one_shot(&cli_path, options, prompt);
        Box::pin(async_stream::stream! {
            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(err) => {
                    yield Err(launch_error(&cli_path, &err));
                    return;
                }
            };
            tracing::debug!(cli = %cli_path.display(), pid = ?child.id(), "started one-shot CLI");
            let stderr = collect_output(child.stderr.take());
            let Some(stdout) = child.stdout.take() else {
                yield Err(TransportError::connection("CLI stdout was not captured"));
                return;
            };
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match decode_line(&line) {
                        Ok(event) => yield Ok(event),
                        Err(error) => {
                            yield Err(error);
                            return;
                        }
                    },
                    Ok(None) => break,
                    Err(err) => {
                        yield Err(TransportError::connection(format!(
                            "failed to read CLI output: {err}"
                        )));
                        return;
                    }
                }
            }
            if let Some(error) = exit_failure(&mut child, stderr).await {
                yield Err(error);
            }
        })
    }

    async fn connect(
        &self,
        options: &SdkOptions,
    ) -> Result<Box<dyn SessionConnection>, TransportError> {
        let mut command = command::session(&self.cli_path, options);
        let mut child = command
            .spawn()
            .map_err(|err| launch_error(&self.cli_path, &err))?;
        tracing::debug!(cli = %self.cli_path.display(), pid = ?child.id(), "started session CLI");
        let stderr = collect_output(child.stderr.take());
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(TransportError::connection("CLI pipes were not captured"));
        };
        Ok(Box::new(CliSession::new(
            child,
            stdin,
            stdout,
            stderr,
            self.disconnect_timeout,
        )))
    }

    fn is_available(&self) -> bool {
        which::which(&self.cli_path).is_ok()
    }
}
