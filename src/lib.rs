//! Maestro: multi-agent orchestration over pluggable model backends.
//!
//! Agents are named, stateful workers created by providers and owned by an
//! [`agent::services::AgentRegistry`]. Every agent turns an incoming
//! [`message::domain::Message`] into a stream of broadcast replies.
//!
//! # Architecture
//!
//! Each subsystem follows hexagonal layering:
//!
//! - **Domain**: pure types with no infrastructure dependencies
//! - **Ports**: trait seams towards agents and backends
//! - **Adapters**: concrete transports and in-memory doubles
//! - **Services**: orchestration built on the ports
//!
//! # Modules
//!
//! - [`message`]: canonical message model
//! - [`agent`]: agent contracts, lifecycle and the registry
//! - [`sdk`]: coding-agent CLI provider
//! - [`openai`]: OpenAI-compatible chat-completions provider
//! - [`settings`], [`telemetry`], [`runtime`]: configuration, logging and
//!   wiring

pub mod agent;
pub mod message;
pub mod openai;
pub mod runtime;
pub mod sdk;
pub mod settings;
pub mod telemetry;
