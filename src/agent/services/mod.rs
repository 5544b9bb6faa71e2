//! Orchestration services for live agents.

mod catalog;
mod registry;
mod report;

pub use catalog::ProviderCatalog;
pub use registry::{AgentFilter, AgentRegistry, RegistryError, RegistryResult};
pub use report::{ShutdownOutcome, ShutdownReport};
