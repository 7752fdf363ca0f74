//! Builds Chat Completions request bodies.

use crate::multimodal::{attach_image, passthrough};
use chatrelay_types::{ChatRequest, Endpoint, RequestTranslator, traits::Result};
use serde_json::{Value, json};

/// Translator from the inbound request to a `POST /chat/completions` body.
pub struct ToChatCompletions {
    /// Sent as `max_tokens`.
    pub max_tokens: u32,
    /// Text paired with the image when there is no user text.
    pub fallback_prompt: String,
}

impl RequestTranslator for ToChatCompletions {
    fn endpoint(&self) -> Endpoint {
        Endpoint::ChatCompletions
    }

    fn translate_request(&self, req: &ChatRequest, model: &str) -> Result<Value> {
        let messages = match req.image.as_deref() {
            Some(image) => attach_image(
                &req.messages,
                image,
                &self.fallback_prompt,
                Endpoint::ChatCompletions,
            )?,
            None => passthrough(&req.messages)?,
        };
        Ok(json!({
            "model": model,
            "messages": messages,
            "max_tokens": self.max_tokens,
        }))
    }
}
