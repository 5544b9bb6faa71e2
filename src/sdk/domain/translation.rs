//! Native event to canonical message translation.

use super::{ContentBlock, ResultEvent, SdkEvent, UserContent};
use crate::agent::domain::AgentName;
use crate::message::domain::{Message, MessageKind, MessageMetadata};
use mockable::Clock;
use serde_json::Value;

/// Translates one native event into zero or more canonical messages.
///
/// Each content block of a bundled turn becomes its own message, in wire
/// order. Bookkeeping events (`system`, `stream_event`, unknown types) and
/// thinking blocks produce nothing. Every message is broadcast from `sender`.
///
/// # Examples
///
/// ```
/// use maestro::agent::domain::AgentName;
/// use maestro::message::domain::MessageKind;
/// use maestro::sdk::domain::{SdkEvent, translate_event};
/// use mockable::DefaultClock;
///
/// let sender = AgentName::new("reviewer").expect("valid name");
/// let messages = translate_event(&SdkEvent::assistant_text("Done"), &sender, &DefaultClock);
///
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].kind(), MessageKind::Chat);
/// ```
#[must_use]
pub fn translate_event(event: &SdkEvent, sender: &AgentName, clock: &impl Clock) -> Vec<Message> {
    match event {
        SdkEvent::Assistant(turn) => turn
            .message
            .content
            .iter()
            .filter_map(|block| translate_block(block, sender, clock))
            .collect(),
        SdkEvent::User(user) => match &user.message.content {
            UserContent::Blocks(blocks) => blocks
                .iter()
                .filter(|block| matches!(block, ContentBlock::ToolResult { .. }))
                .filter_map(|block| translate_block(block, sender, clock))
                .collect(),
            UserContent::Text(_) => Vec::new(),
        },
        SdkEvent::Result(result) => vec![translate_result(result, sender, clock)],
        SdkEvent::System(_) | SdkEvent::StreamEvent(_) | SdkEvent::Unknown => Vec::new(),
    }
}

fn translate_block(block: &ContentBlock, sender: &AgentName, clock: &impl Clock) -> Option<Message> {
    match block {
        ContentBlock::Text { text } => Some(Message::broadcast(
            sender,
            MessageKind::Chat,
            text.as_str(),
            MessageMetadata::new().with("sdk_type", "assistant_text"),
            clock,
        )),
        ContentBlock::ToolUse { id, name, input } => Some(Message::broadcast(
            sender,
            MessageKind::System,
            format!("Using tool: {name}"),
            MessageMetadata::new()
                .with("sdk_type", "tool_use")
                .with("tool_name", name.as_str())
                .with("tool_input", input.clone())
                .with("tool_use_id", id.as_str()),
            clock,
        )),
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => Some(Message::broadcast(
            sender,
            MessageKind::System,
            tool_result_text(content.as_ref()),
            MessageMetadata::new()
                .with("sdk_type", "tool_result")
                .with("tool_use_id", tool_use_id.as_str())
                .with("is_error", is_error.unwrap_or(false)),
            clock,
        )),
        ContentBlock::Thinking { .. } | ContentBlock::Unknown => None,
    }
}

/// Flattens tool output, which is either a string or a list of text blocks.
fn tool_result_text(content: Option<&Value>) -> String {
    match content {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => other.to_string(),
    }
}

fn translate_result(result: &ResultEvent, sender: &AgentName, clock: &impl Clock) -> Message {
    let kind = if result.subtype == "success" {
        MessageKind::Chat
    } else {
        MessageKind::System
    };
    let content = result
        .result
        .clone()
        .unwrap_or_else(|| format!("Run finished: {}", result.subtype));
    let metadata = MessageMetadata::new()
        .with("sdk_type", "result")
        .with("subtype", result.subtype.as_str())
        .with("session_id", result.session_id.as_str())
        .with("is_error", result.is_error)
        .with_optional("num_turns", result.num_turns)
        .with_optional("duration_ms", result.duration_ms)
        .with_optional("total_cost_usd", result.total_cost_usd);
    Message::broadcast(sender, kind, content, metadata, clock)
}
