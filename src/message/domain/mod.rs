//! Domain types for the canonical message model.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! All types are immutable after construction and serialisable via serde.

mod ids;
mod kind;
mod message;
mod metadata;

pub use ids::MessageId;
pub use kind::{MessageKind, ParseMessageKindError};
pub use message::{BROADCAST, Message, MessageBuilder, MessageBuilderError};
pub use metadata::MessageMetadata;
