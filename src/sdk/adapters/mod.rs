//! Transport adapters for the coding-agent backend.
//!
//! - [`cli`] launches the real CLI as a subprocess
//! - [`memory`] replays scripted responses for tests and demos

pub mod cli;
pub mod memory;
