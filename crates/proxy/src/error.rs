//! API error type that maps [`RelayError`] variants to HTTP responses.
//!
//! Every error body is a JSON object with an `error` string, plus `details`
//! for provider errors or `message` for internal failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_translate::upstream_error_message;
use chatrelay_types::RelayError;
use serde_json::{Value, json};

/// `error` value for a provider failure that carries no message of its own.
pub const GENERIC_UPSTREAM_ERROR: &str = "Provider API error";
/// `error` value for transport and other unexpected failures.
pub const SERVER_ERROR: &str = "Server error";

/// Wrapper around [`RelayError`] that implements [`IntoResponse`].
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl ApiError {
    /// Returns the status code and JSON body for the wrapped error.
    fn render(self) -> (StatusCode, Value) {
        match self.0 {
            RelayError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            e @ RelayError::MissingCredential(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": e.to_string() }),
            ),
            RelayError::Upstream { status, body } => {
                let details =
                    serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
                let error = upstream_error_message(&details)
                    .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string());
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, json!({ "error": error, "details": details }))
            }
            e @ (RelayError::Http(_) | RelayError::Serialization(_) | RelayError::Config(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": SERVER_ERROR, "message": e.to_string() }),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            RelayError::Validation(msg) => tracing::warn!(error = %msg, "rejected chat request"),
            RelayError::Upstream { status, .. } => {
                tracing::error!(status = *status, "provider returned an error");
            }
            other => tracing::error!(error = %other, "chat request failed"),
        }
        let (status, body) = self.render();
        (status, Json(body)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        Self(e)
    }
}
