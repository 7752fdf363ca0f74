//! Provider endpoint families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The provider endpoint a request is sent to.
///
/// The two families differ in request schema (`input` vs `messages`) and
/// response schema (`output_text` / `output[]` vs `choices[]`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// `POST {base}/responses`
    #[default]
    Responses,
    /// `POST {base}/chat/completions`
    ChatCompletions,
}

impl Endpoint {
    /// Path segment appended to the provider base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Responses => "responses",
            Self::ChatCompletions => "chat/completions",
        }
    }

    /// Builds the full endpoint URL from a base such as `https://api.openai.com/v1`.
    #[must_use]
    pub fn url(self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Responses => write!(f, "responses"),
            Self::ChatCompletions => write!(f, "chat_completions"),
        }
    }
}
