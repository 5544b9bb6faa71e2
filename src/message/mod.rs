//! Canonical message model shared by every provider.
//!
//! Each backend emits its own native event shapes; providers translate them
//! into [`domain::Message`] values so downstream consumers see one uniform,
//! backend-agnostic stream.
//!
//! # Example
//!
//! ```
//! use maestro::message::domain::{Message, MessageKind};
//! use mockable::DefaultClock;
//!
//! let task = Message::builder("human")
//!     .to("planner")
//!     .with_kind(MessageKind::Command)
//!     .with_content("List the open issues")
//!     .build(&DefaultClock)
//!     .expect("valid message");
//!
//! assert_eq!(task.sender(), "human");
//! ```

pub mod domain;
