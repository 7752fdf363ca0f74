//! Chat handler. Validates the inbound request, forwards it to the provider
//! and returns the normalized response.

use axum::{Json, extract::State, http::StatusCode};
use bytes::Bytes;
use chatrelay_translate::{Normalizer, parse_request};
use chatrelay_types::{
    NormalizedResponse, ProviderClient as _, RelayError, RequestTranslator as _,
    ResponseTranslator as _,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{AppState, error::ApiError};

/// Handles `POST {path}` requests.
///
/// The credential is checked before the body, so a server without a
/// credential answers 500 whatever the caller sent.
///
/// # Errors
///
/// Returns [`ApiError`] if the credential is missing, the body is invalid,
/// or the provider call fails.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<NormalizedResponse>, ApiError> {
    let credentials = state.credentials.as_ref().ok_or_else(|| {
        RelayError::MissingCredential(state.config.provider.api_key_env.clone())
    })?;

    let request = parse_request(&body)?;
    let has_image = request.has_image();
    let model = state
        .config
        .provider
        .select_model(request.model.as_deref(), has_image);
    let endpoint = state.translator.endpoint();

    tracing::info!(
        model = %model,
        endpoint = %endpoint,
        image = has_image,
        messages = request.messages.len(),
        "chat request"
    );

    let payload = state.translator.translate_request(&request, &model)?;
    let raw = state.provider.send(endpoint, payload, credentials).await?;
    let normalized = Normalizer.translate_response(&raw)?;

    tracing::debug!(
        model = %model,
        input_tokens = normalized.usage.input_tokens,
        output_tokens = normalized.usage.output_tokens,
        "chat request complete"
    );
    Ok(Json(normalized))
}

/// Handles `OPTIONS {path}`: CORS headers are added by the router layers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Answers every method other than `POST` and `OPTIONS`.
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
