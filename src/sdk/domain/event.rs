//! Native events emitted by the coding-agent CLI.
//!
//! The CLI writes one JSON object per line with a `type` discriminator.
//! Only fields the translator reads are modelled; everything else is kept in
//! loosely typed maps or ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event `type` values this crate understands.
pub const KNOWN_EVENT_TYPES: [&str; 5] = ["system", "assistant", "user", "result", "stream_event"];

/// One native event from the backend stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SdkEvent {
    /// Protocol bookkeeping such as session initialisation.
    System(SystemEvent),
    /// One assistant turn, possibly bundling several content blocks.
    Assistant(AssistantEvent),
    /// Content fed back to the model, typically tool results.
    User(UserEvent),
    /// Final summary of a response cycle.
    Result(ResultEvent),
    /// Partial streaming update.
    StreamEvent(StreamEvent),
    /// Any other event type.
    #[serde(other)]
    Unknown,
}

impl SdkEvent {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::System(_) => "system",
            Self::Assistant(_) => "assistant",
            Self::User(_) => "user",
            Self::Result(_) => "result",
            Self::StreamEvent(_) => "stream_event",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for the event that closes a response cycle.
    #[must_use]
    pub const fn is_result(&self) -> bool {
        matches!(self, Self::Result(_))
    }

    /// Builds an assistant event holding `blocks`.
    #[must_use]
    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        Self::Assistant(AssistantEvent {
            message: AssistantBody {
                model: None,
                content: blocks,
            },
            session_id: None,
            parent_tool_use_id: None,
        })
    }

    /// Builds an assistant event holding a single text block.
    #[must_use]
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::assistant(vec![ContentBlock::Text { text: text.into() }])
    }

    /// Builds a successful result event.
    #[must_use]
    pub fn success(session_id: impl Into<String>, result: impl Into<String>) -> Self {
        Self::Result(ResultEvent {
            subtype: "success".to_owned(),
            result: Some(result.into()),
            session_id: session_id.into(),
            is_error: false,
            duration_ms: None,
            num_turns: None,
            total_cost_usd: None,
        })
    }
}

/// `system` event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
    /// Kind of bookkeeping, e.g. `init`.
    pub subtype: String,
    /// Remaining fields.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// `assistant` event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantEvent {
    /// Model output for this turn.
    pub message: AssistantBody,
    /// Backend session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Tool call this turn is nested under, for sub-agents.
    #[serde(default)]
    pub parent_tool_use_id: Option<String>,
}

/// Body of an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantBody {
    /// Model that produced the turn.
    #[serde(default)]
    pub model: Option<String>,
    /// Ordered content blocks.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// `user` event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    /// Content fed back to the model.
    pub message: UserBody,
    /// Backend session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Body of a user event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBody {
    /// Plain text or content blocks.
    pub content: UserContent,
}

/// User content in either of its two wire shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    /// Plain prompt text.
    Text(String),
    /// Structured blocks.
    Blocks(Vec<ContentBlock>),
}

/// One block inside an assistant or user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// Text content.
        text: String,
    },
    /// A tool invocation.
    ToolUse {
        /// Invocation identifier.
        id: String,
        /// Tool name.
        name: String,
        /// Tool arguments.
        #[serde(default)]
        input: Value,
    },
    /// Output of a tool invocation.
    ToolResult {
        /// Identifier of the invocation this answers.
        tool_use_id: String,
        /// String or array of text blocks.
        #[serde(default)]
        content: Option<Value>,
        /// Whether the tool failed.
        #[serde(default)]
        is_error: Option<bool>,
    },
    /// Model reasoning. Never surfaced.
    Thinking {
        /// Reasoning text.
        #[serde(default)]
        thinking: String,
    },
    /// Any other block type.
    #[serde(other)]
    Unknown,
}

/// `result` event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
    /// `success` or an error subtype such as `error_max_turns`.
    pub subtype: String,
    /// Final text answer.
    #[serde(default)]
    pub result: Option<String>,
    /// Backend session identifier.
    #[serde(default)]
    pub session_id: String,
    /// Whether the cycle ended in error.
    #[serde(default)]
    pub is_error: bool,
    /// Wall-clock duration.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Number of model turns.
    #[serde(default)]
    pub num_turns: Option<u32>,
    /// Reported cost.
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
}

/// `stream_event` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Backend session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Raw partial event.
    #[serde(default)]
    pub event: Value,
}
