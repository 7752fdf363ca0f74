//! Attaches an image to the most recent user turn.
//!
//! Only that one message is restructured into `[text, image]` content parts;
//! every other message is forwarded unchanged. The part schema depends on
//! the endpoint family:
//!
//! - chat completions: `{"type":"text"}` + `{"type":"image_url","image_url":{"url"}}`
//! - responses: `{"type":"input_text"}` + `{"type":"input_image","image_url"}`

use chatrelay_types::{ChatMessage, Endpoint, MessageContent, Role, traits::Result};
use serde_json::{Value, json};

/// Builds a text content part for `endpoint`.
#[must_use]
pub fn text_part(endpoint: Endpoint, text: &str) -> Value {
    match endpoint {
        Endpoint::Responses => json!({"type": "input_text", "text": text}),
        Endpoint::ChatCompletions => json!({"type": "text", "text": text}),
    }
}

/// Builds an image content part for `endpoint`. `url` may be a data-URI.
#[must_use]
pub fn image_part(endpoint: Endpoint, url: &str) -> Value {
    match endpoint {
        Endpoint::Responses => json!({"type": "input_image", "image_url": url}),
        Endpoint::ChatCompletions => json!({"type": "image_url", "image_url": {"url": url}}),
    }
}

/// Index of the last message with role `user`, scanning from the end.
#[must_use]
pub fn last_user_index(messages: &[ChatMessage]) -> Option<usize> {
    messages.iter().rposition(|m| m.role == Role::User)
}

/// Encodes messages for the provider without modification.
///
/// # Errors
///
/// Returns a serialization error if a message cannot be encoded.
pub fn passthrough(messages: &[ChatMessage]) -> Result<Vec<Value>> {
    messages
        .iter()
        .map(|m| serde_json::to_value(m).map_err(Into::into))
        .collect()
}

/// Returns the messages with `image` attached to the last user turn.
///
/// The text part carries that turn's text, or `fallback_prompt` when it has
/// none. If the conversation has no user turn, a new one is appended.
///
/// # Errors
///
/// Returns a serialization error if a message cannot be encoded.
pub fn attach_image(
    messages: &[ChatMessage],
    image: &str,
    fallback_prompt: &str,
    endpoint: Endpoint,
) -> Result<Vec<Value>> {
    let idx = last_user_index(messages);
    let mut turn = idx.map_or_else(
        || ChatMessage::new(Role::User, ""),
        |i| messages[i].clone(),
    );

    let text = Some(turn.text())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| fallback_prompt.to_string());
    turn.content = Some(MessageContent::Parts(vec![
        text_part(endpoint, &text),
        image_part(endpoint, image),
    ]));

    let mut out = passthrough(messages)?;
    let turn = serde_json::to_value(&turn)?;
    match idx {
        Some(i) => out[i] = turn,
        None => out.push(turn),
    }
    Ok(out)
}
