//! Step definitions for registry lifecycle scenarios.

mod given;
mod then;
mod when;
pub mod world;
