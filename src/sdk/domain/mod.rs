//! Domain types for the coding-agent CLI provider.

mod event;
mod options;
mod translation;

pub use event::{
    AssistantBody, AssistantEvent, ContentBlock, KNOWN_EVENT_TYPES, ResultEvent, SdkEvent,
    StreamEvent, SystemEvent, UserBody, UserContent, UserEvent,
};
pub use options::{DEFAULT_PERMISSION_MODE, ExecutionMode, SdkOptions};
pub use translation::translate_event;
