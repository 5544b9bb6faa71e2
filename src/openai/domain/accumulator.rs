//! Reassembly of streamed completion chunks.

use super::{ChatMessage, ChatRole, ToolCall};
use async_openai::types::CreateChatCompletionStreamResponse;
use std::collections::BTreeMap;

/// Complete assistant turn assembled from a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantTurn {
    /// Concatenated text.
    pub text: String,
    /// Tool calls ordered by index.
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantTurn {
    /// Returns the history entry recording this turn.
    #[must_use]
    pub fn to_history(&self) -> ChatMessage {
        let content = if self.tool_calls.is_empty() || !self.text.is_empty() {
            Some(self.text.clone())
        } else {
            None
        };
        ChatMessage {
            role: ChatRole::Assistant,
            content,
            tool_calls: self.tool_calls.clone(),
        }
    }
}

/// Accumulates text and tool-call fragments across chunks.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    text: String,
    tool_calls: BTreeMap<i64, ToolCall>,
}

impl ResponseAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one chunk in. Only the first choice is read; chunks without
    /// choices are ignored.
    pub fn push(&mut self, chunk: &CreateChatCompletionStreamResponse) {
        let Some(choice) = chunk.choices.first() else {
            return;
        };
        if let Some(content) = &choice.delta.content {
            self.text.push_str(content);
        }
        for fragment in choice.delta.tool_calls.iter().flatten() {
            let call = self.tool_calls.entry(i64::from(fragment.index)).or_default();
            if let Some(id) = fragment.id.as_deref().filter(|id| !id.is_empty()) {
                id.clone_into(&mut call.id);
            }
            if let Some(function) = &fragment.function {
                if let Some(name) = &function.name {
                    call.name.push_str(name);
                }
                if let Some(arguments) = &function.arguments {
                    call.arguments.push_str(arguments);
                }
            }
        }
    }

    /// Returns the assembled turn.
    #[must_use]
    pub fn finish(self) -> AssistantTurn {
        AssistantTurn {
            text: self.text,
            tool_calls: self.tool_calls.into_values().collect(),
        }
    }
}
