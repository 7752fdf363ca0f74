//! Request and response translators between the relay's inbound contract and
//! the provider's endpoint schemas.
//!
//! All translators are pure functions with no I/O.

pub mod multimodal;
pub mod normalize;
pub mod request;
pub mod to_chat_completions;
pub mod to_responses;

pub use normalize::{Normalizer, extract_text, extract_usage, upstream_error_message};
pub use request::parse_request;
pub use to_chat_completions::ToChatCompletions;
pub use to_responses::ToResponses;

use chatrelay_types::{Endpoint, RequestTranslator};

/// Returns the request translator for `endpoint`.
#[must_use]
pub fn translator_for(
    endpoint: Endpoint,
    max_output_tokens: u32,
    fallback_prompt: impl Into<String>,
) -> Box<dyn RequestTranslator> {
    let fallback_prompt = fallback_prompt.into();
    match endpoint {
        Endpoint::Responses => Box::new(ToResponses {
            max_output_tokens,
            fallback_prompt,
        }),
        Endpoint::ChatCompletions => Box::new(ToChatCompletions {
            max_tokens: max_output_tokens,
            fallback_prompt,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translator_for_matches_endpoint() {
        for endpoint in [Endpoint::Responses, Endpoint::ChatCompletions] {
            assert_eq!(translator_for(endpoint, 100, "x").endpoint(), endpoint);
        }
    }
}
