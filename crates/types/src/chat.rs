//! Inbound chat request model and the normalized response contract.
//!
//! Messages are strongly typed at the role level but keep their content and
//! any unknown fields intact, so a message that is not reshaped is forwarded
//! to the provider exactly as the caller sent it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Message content: either a plain string or an array of content parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<Value>),
}

/// Part types whose `text` field carries user-visible text.
const TEXT_PART_TYPES: &[&str] = &["text", "input_text", "output_text"];

impl MessageContent {
    /// Returns the textual content.
    ///
    /// Array content yields the newline-joined `text` of its text parts;
    /// image and other parts are ignored.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter(|p| {
                    p.get("type")
                        .and_then(Value::as_str)
                        .is_some_and(|t| TEXT_PART_TYPES.contains(&t))
                })
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A single chat message as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    /// Any other fields on the message (e.g. `name`), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    /// Creates a message with plain string content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(MessageContent::Text(content.into())),
            extra: Map::new(),
        }
    }

    /// Returns the textual content, or an empty string when there is none.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(MessageContent::text)
            .unwrap_or_default()
    }
}

/// A validated inbound request: `{ messages, image?, model? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The conversation, never empty once validated.
    pub messages: Vec<ChatMessage>,
    /// Image URL or base64 data-URI attached to the latest user turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Caller-chosen model; overrides the configured defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatRequest {
    /// Returns `true` if an image is attached.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Token counts reported back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The assistant message inside a normalized choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: Role,
    pub content: String,
}

/// A single normalized choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

/// The stable response shape returned to callers regardless of which
/// provider endpoint served the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl NormalizedResponse {
    /// Builds a single-choice response carrying the assistant's text.
    pub fn new(content: impl Into<String>, usage: Usage) -> Self {
        Self {
            choices: vec![Choice {
                message: AssistantMessage {
                    role: Role::Assistant,
                    content: content.into(),
                },
            }],
            usage,
        }
    }

    /// Returns the assistant text of the first choice.
    #[must_use]
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .map_or("", |c| c.message.content.as_str())
    }
}
