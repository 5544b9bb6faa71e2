//! Strict decoding of CLI output lines.

use crate::sdk::domain::{KNOWN_EVENT_TYPES, SdkEvent};
use crate::sdk::ports::TransportError;
use serde_json::Value;

/// Decodes one line of `stream-json` output.
///
/// Unlike plain deserialisation, an unrecognised `type` is an error naming
/// the type, which is how the backend's rate-limit signal reaches recovery.
///
/// # Errors
///
/// Returns a `MessageParse` [`TransportError`] for invalid JSON, a missing
/// `type`, an unknown `type`, or a known type with a malformed body.
pub fn decode_line(line: &str) -> Result<SdkEvent, TransportError> {
    let value: Value = serde_json::from_str(line)
        .map_err(|err| TransportError::message_parse(format!("Failed to decode JSON: {err}")))?;

    let event_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| TransportError::message_parse("Message missing 'type' field"))?;

    if !KNOWN_EVENT_TYPES.contains(&event_type) {
        return Err(TransportError::message_parse(format!(
            "Unknown message type: {event_type}"
        )));
    }

    let event_type = event_type.to_owned();
    serde_json::from_value(value).map_err(|err| {
        TransportError::message_parse(format!("Malformed {event_type} message: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::ports::TransportErrorKind;
    use rstest::rstest;

    #[test]
    fn decodes_result_line() {
        let event = decode_line(
            r#"{"type":"result","subtype":"success","result":"ok","session_id":"s","is_error":false}"#,
        )
        .expect("result line decodes");
        assert!(event.is_result());
    }

    #[rstest]
    #[case("not json", "Failed to decode JSON")]
    #[case(r#"{"subtype":"init"}"#, "Message missing 'type' field")]
    #[case(r#"{"type":"rate_limit_event","retry_after":3}"#, "Unknown message type: rate_limit_event")]
    #[case(r#"{"type":"assistant","message":7}"#, "Malformed assistant message")]
    fn rejects_bad_lines(#[case] line: &str, #[case] expected: &str) {
        let error = decode_line(line).expect_err("line should be rejected");
        assert_eq!(error.kind(), TransportErrorKind::MessageParse);
        assert!(
            error.message().starts_with(expected),
            "unexpected message: {}",
            error.message()
        );
    }
}
