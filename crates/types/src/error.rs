//! Unified error type for the chatrelay workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur while relaying a chat request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound request body is malformed or missing required fields.
    #[error("{0}")]
    Validation(String),

    /// The provider credential is not configured. Holds the name of the
    /// environment variable the credential is read from.
    #[error("Missing {0}")]
    MissingCredential(String),

    /// The upstream provider returned a non-success status.
    #[error("upstream error: status={status}, body={body}")]
    Upstream { status: u16, body: String },

    /// HTTP transport error.
    #[error("{0}")]
    Http(String),

    /// JSON serialization or deserialization error.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl RelayError {
    /// Shorthand for [`RelayError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RelayError>;
