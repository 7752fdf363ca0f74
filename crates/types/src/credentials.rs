//! Provider credential, resolved once at start-up and injected into handlers.

use secrecy::{ExposeSecret as _, SecretString};
use std::fmt;

/// A bearer token for the upstream provider.
///
/// The secret is never printed by `Debug`.
#[derive(Clone)]
pub struct Credentials {
    api_key: SecretString,
}

impl Credentials {
    /// Wraps an API key. Returns `None` for an empty or whitespace-only key.
    pub fn new(api_key: impl Into<String>) -> Option<Self> {
        let key: String = api_key.into();
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            api_key: SecretString::from(key.to_string()),
        })
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key.expose_secret())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
