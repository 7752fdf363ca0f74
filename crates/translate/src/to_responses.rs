//! Builds Responses API request bodies.
//!
//! Messages travel as `input` unchanged unless an image is attached, in which
//! case the last user turn becomes `input_text` + `input_image` parts.

use crate::multimodal::{attach_image, passthrough};
use chatrelay_types::{ChatRequest, Endpoint, RequestTranslator, traits::Result};
use serde_json::{Value, json};

/// Translator from the inbound request to a `POST /responses` body.
pub struct ToResponses {
    /// Sent as `max_output_tokens`.
    pub max_output_tokens: u32,
    /// Text paired with the image when there is no user text.
    pub fallback_prompt: String,
}

impl RequestTranslator for ToResponses {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Responses
    }

    fn translate_request(&self, req: &ChatRequest, model: &str) -> Result<Value> {
        let input = match req.image.as_deref() {
            Some(image) => attach_image(
                &req.messages,
                image,
                &self.fallback_prompt,
                Endpoint::Responses,
            )?,
            None => passthrough(&req.messages)?,
        };
        Ok(json!({
            "model": model,
            "input": input,
            "max_output_tokens": self.max_output_tokens,
        }))
    }
}
