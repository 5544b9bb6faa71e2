//! Agent, provider and recovery services for the coding-agent backend.

mod agent;
mod provider;
mod recovery;

pub use agent::{SDK_AGENT_TYPE, SdkAgent};
pub use provider::{SDK_PROVIDER_KEY, SdkProvider};
pub use recovery::{RecoveryController, RecoveryError, SessionItem};
