//! Traits shared across chatrelay crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `chatrelay-types`, not on each other.

use crate::{ChatRequest, Credentials, Endpoint, NormalizedResponse};
use async_trait::async_trait;
use serde_json::Value;

pub use crate::error::Result;

/// Builds a provider-native request body from a validated inbound request.
///
/// Implementations must be pure (no I/O).
pub trait RequestTranslator: Send + Sync {
    /// The endpoint family this translator produces payloads for.
    fn endpoint(&self) -> Endpoint;

    /// Convert the inbound request into the provider's JSON payload for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RelayError::Serialization`] if a message cannot be
    /// re-encoded.
    fn translate_request(&self, req: &ChatRequest, model: &str) -> Result<Value>;
}

/// Reduces a provider-native response body to the normalized contract.
///
/// Implementations must be pure (no I/O).
pub trait ResponseTranslator: Send + Sync {
    /// Convert a provider JSON response body to a [`NormalizedResponse`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the body cannot be interpreted at all.
    fn translate_response(&self, res: &Value) -> Result<NormalizedResponse>;
}

/// Sends a prepared payload to the upstream provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// POST `payload` to `endpoint` and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RelayError::Upstream`] on a non-success status,
    /// [`crate::RelayError::Http`] on transport failure, and
    /// [`crate::RelayError::Serialization`] if the body is not JSON.
    async fn send(
        &self,
        endpoint: Endpoint,
        payload: Value,
        credentials: &Credentials,
    ) -> Result<Value>;
}
