//! Tracing subscriber installation.

use crate::settings::{LogFormat, LogSettings};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {source}")]
    Filter {
        /// Rejected directive.
        directive: String,
        /// Parser failure.
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Builds the filter: `RUST_LOG` when set, else the configured level.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured level does not
/// parse.
pub fn filter(settings: &LogSettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&settings.level).map_err(|source| TelemetryError::Filter {
            directive: settings.level.clone(),
            source,
        })
    })
}

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which leaves
/// the existing one in place.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured level does not
/// parse.
pub fn init(settings: &LogSettings) -> Result<bool, TelemetryError> {
    let registry = tracing_subscriber::registry().with(filter(settings)?);
    let installed = match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    }
    .is_ok();
    if installed {
        tracing::debug!(level = %settings.level, format = ?settings.format, "telemetry initialised");
    }
    Ok(installed)
}
