//! Shared HTTP client construction.

use std::time::Duration;

/// Build an HTTP client, optionally configured with a proxy URL and a
/// request timeout.
///
/// An invalid proxy URL is logged and ignored rather than aborting start-up.
#[must_use]
pub fn build_http_client(proxy_url: Option<&str>, timeout_secs: Option<u64>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(url) = proxy_url {
        match reqwest::Proxy::all(url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(e) => {
                tracing::warn!(url = url, error = %e, "invalid proxy_url, using direct connection");
            }
        }
    }
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to build configured http client, using defaults");
        reqwest::Client::new()
    })
}
