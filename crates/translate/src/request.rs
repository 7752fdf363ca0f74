//! Validation of the inbound request body.

use chatrelay_types::{ChatMessage, ChatRequest, RelayError, traits::Result};
use serde_json::{Map, Value};

/// Message returned when `messages` is absent, not an array, or empty.
pub const INVALID_MESSAGES: &str = "Missing or invalid messages";

/// Parses and validates a raw JSON request body.
///
/// # Errors
///
/// Returns [`RelayError::Validation`] if the body is not a JSON object, if
/// `messages` is absent, not an array, or empty, if any message has an
/// unknown role, or if `image` / `model` is present but not a string.
pub fn parse_request(body: &[u8]) -> Result<ChatRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::validation(format!("Invalid JSON body: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| RelayError::validation("Request body must be a JSON object"))?;

    let raw_messages = obj
        .get("messages")
        .and_then(Value::as_array)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| RelayError::validation(INVALID_MESSAGES))?;

    let messages = raw_messages
        .iter()
        .enumerate()
        .map(|(i, m)| {
            serde_json::from_value::<ChatMessage>(m.clone())
                .map_err(|e| RelayError::validation(format!("Invalid message at index {i}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChatRequest {
        messages,
        image: optional_string(obj, "image")?,
        model: optional_string(obj, "model")?,
    })
}

/// Reads an optional string field. Blank strings count as absent.
fn optional_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RelayError::validation(format!("'{key}' must be a string"))),
    }
}
