//! Normalizes provider responses into the relay's stable response contract.
//!
//! The provider populates the assistant text in different places depending
//! on the endpoint and model, so extraction is an ordered list of pure
//! strategies. The first one that yields a non-empty string wins.

use chatrelay_types::{NormalizedResponse, ResponseTranslator, Usage, traits::Result};
use serde_json::Value;

/// A single text extraction strategy.
pub type TextExtractor = fn(&Value) -> Option<String>;

/// Extraction strategies in priority order.
pub const TEXT_EXTRACTORS: &[(&str, TextExtractor)] = &[
    ("output_text", output_text),
    ("output[0].content[0].text", first_output_content),
    ("output[type=message].output_text", first_message_output_text),
    ("choices[0].message.content", chat_choice_content),
];

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Top-level `output_text` convenience field of the Responses API.
fn output_text(res: &Value) -> Option<String> {
    res.get("output_text").and_then(Value::as_str).and_then(non_empty)
}

fn first_output_content(res: &Value) -> Option<String> {
    res.pointer("/output/0/content/0/text")
        .and_then(Value::as_str)
        .and_then(non_empty)
}

/// Reasoning models emit a `reasoning` item before the `message` item.
fn first_message_output_text(res: &Value) -> Option<String> {
    res.get("output")
        .and_then(Value::as_array)?
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some("message"))
        .and_then(|msg| msg.get("content").and_then(Value::as_array))?
        .iter()
        .find(|p| p.get("type").and_then(Value::as_str) == Some("output_text"))
        .and_then(|p| p.get("text").and_then(Value::as_str))
        .and_then(non_empty)
}

fn chat_choice_content(res: &Value) -> Option<String> {
    res.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .and_then(non_empty)
}

/// Returns the assistant text, or an empty string when no strategy matches.
#[must_use]
pub fn extract_text(res: &Value) -> String {
    TEXT_EXTRACTORS
        .iter()
        .find_map(|(_, extract)| extract(res))
        .unwrap_or_default()
}

/// Returns token usage, accepting both the Responses field names and the
/// legacy chat completions ones. Missing counts are zero.
#[must_use]
pub fn extract_usage(res: &Value) -> Usage {
    let count = |names: [&str; 2]| {
        names
            .iter()
            .find_map(|n| res.get("usage")?.get(*n)?.as_u64())
            .unwrap_or(0)
    };
    Usage {
        input_tokens: count(["input_tokens", "prompt_tokens"]),
        output_tokens: count(["output_tokens", "completion_tokens"]),
    }
}

/// Pulls a human-readable message out of a provider error body.
///
/// Accepts `{"error":{"message":..}}`, `{"error":".."}` and `{"message":..}`.
#[must_use]
pub fn upstream_error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("error").filter(|e| e.is_string()))
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .and_then(non_empty)
}

/// Translator from either provider response shape to [`NormalizedResponse`].
pub struct Normalizer;

impl ResponseTranslator for Normalizer {
    /// # Errors
    ///
    /// Currently infallible; returns an empty assistant message for
    /// unexpected shapes.
    fn translate_response(&self, res: &Value) -> Result<NormalizedResponse> {
        Ok(NormalizedResponse::new(extract_text(res), extract_usage(res)))
    }
}
