//! Domain types for agent configuration and lifecycle.
//!
//! These types carry no I/O. Providers consume [`AgentConfig`] and drive an
//! [`AgentStateCell`]; the registry projects live entries as [`AgentInfo`].

mod config;
mod credentials;
mod error;
mod info;
mod name;
mod state;

pub use config::AgentConfig;
pub use credentials::{Credentials, keys as credential_keys};
pub use error::{AgentDomainError, ParseAgentStateError};
pub use info::AgentInfo;
pub use name::AgentName;
pub use state::{AgentState, AgentStateCell, ProcessingGuard};
