//! Conversion of an assistant turn into routed messages.

use super::AssistantTurn;
use crate::agent::domain::AgentName;
use crate::message::domain::{Message, MessageKind, MessageMetadata};
use mockable::Clock;

/// Provider tag stamped on every message.
pub const OPENAI_PROVIDER_TAG: &str = "openai";

/// Builds the broadcast messages for one completed turn.
///
/// Non-blank text becomes one chat message; each tool call becomes one
/// system message, in call order.
#[must_use]
pub fn build_messages(
    turn: &AssistantTurn,
    sender: &AgentName,
    model: &str,
    clock: &impl Clock,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(turn.tool_calls.len() + 1);
    if !turn.text.trim().is_empty() {
        let metadata = MessageMetadata::new()
            .with("provider", OPENAI_PROVIDER_TAG)
            .with("model", model);
        messages.push(Message::broadcast(
            sender,
            MessageKind::Chat,
            turn.text.clone(),
            metadata,
            clock,
        ));
    }
    for call in &turn.tool_calls {
        let metadata = MessageMetadata::new()
            .with("provider", OPENAI_PROVIDER_TAG)
            .with("model", model)
            .with("type", "tool_call")
            .with("tool_call_id", call.id.as_str())
            .with("tool_name", call.name.as_str())
            .with("tool_arguments", call.arguments.as_str());
        messages.push(Message::broadcast(
            sender,
            MessageKind::System,
            format!("Tool call: {}", call.name),
            metadata,
            clock,
        ));
    }
    messages
}
