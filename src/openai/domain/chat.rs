//! Conversation model kept by chat agents.
//!
//! Completion clients translate these into their own request types; the
//! history never depends on a particular wire format.

/// Speaker of a chat history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// System prompt.
    System,
    /// Caller input.
    User,
    /// Model output.
    Assistant,
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Speaker.
    pub role: ChatRole,
    /// Text content. `None` for assistant turns that only call tools.
    pub content: Option<String>,
    /// Tool calls made by an assistant turn.
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    /// Creates a system prompt entry.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(ChatRole::System, content)
    }

    /// Creates a user entry.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(ChatRole::User, content)
    }

    fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// A completed function call requested by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCall {
    /// Call identifier.
    pub id: String,
    /// Function name.
    pub name: String,
    /// JSON-encoded arguments, as produced by the model.
    pub arguments: String,
}

/// A completion request: the model and the conversation so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation so far.
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Creates a request for `model`.
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }
}
