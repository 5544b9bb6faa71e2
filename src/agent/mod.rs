//! Agent lifecycle: configuration, provider contracts and the registry.
//!
//! The module follows the hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Concrete providers live in their own modules and plug in through
//! [`ports::AgentProvider`].

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
