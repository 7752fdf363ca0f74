//! HTTP layer: axum router, CORS headers and error mapping.
//!
//! Exposes a single chat endpoint (default `/api/chat`) that accepts
//! `{ messages, image?, model? }`, forwards it to the configured provider
//! endpoint, and answers with a normalized `{ choices, usage }` body.

mod chat;
mod error;

pub use error::{ApiError, GENERIC_UPSTREAM_ERROR, SERVER_ERROR};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::post,
};
use chatrelay_config::Config;
use chatrelay_provider::OpenAiClient;
use chatrelay_translate::translator_for;
use chatrelay_types::{Credentials, ProviderClient, RequestTranslator};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Methods advertised in `Access-Control-Allow-Methods`.
const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Shared application state passed to the route handler.
///
/// Everything here is read-only after start-up.
pub struct AppState {
    /// Server configuration.
    pub config: Arc<Config>,
    /// Provider credential; `None` makes every chat request fail with 500.
    pub credentials: Option<Credentials>,
    /// Outbound client for the provider.
    pub provider: Arc<dyn ProviderClient>,
    /// Builds payloads for the configured endpoint family.
    pub translator: Box<dyn RequestTranslator>,
}

impl AppState {
    /// Creates a new shared application state wrapped in an `Arc`.
    pub fn new(
        config: Config,
        credentials: Option<Credentials>,
        provider: Arc<dyn ProviderClient>,
    ) -> Arc<Self> {
        let translator = translator_for(
            config.provider.endpoint,
            config.provider.max_output_tokens,
            config.provider.fallback_prompt.clone(),
        );
        Arc::new(Self {
            config: Arc::new(config),
            credentials,
            provider,
            translator,
        })
    }

    /// Creates the production state: credential from config or environment,
    /// reqwest-backed provider client.
    #[must_use]
    pub fn from_config(config: Config) -> Arc<Self> {
        let credentials = config.provider.credentials_from_env();
        if credentials.is_none() {
            tracing::warn!(
                var = %config.provider.api_key_env,
                "no provider credential configured; chat requests will fail"
            );
        }
        let provider = Arc::new(OpenAiClient::from_config(&config.provider));
        Self::new(config, credentials, provider)
    }
}

fn header_value(value: &str, fallback: &'static str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| {
        tracing::warn!(value = value, "invalid CORS header value, using default");
        HeaderValue::from_static(fallback)
    })
}

/// Build the full axum router.
///
/// Routes (on `config.path`, default `/api/chat`):
/// - POST    chat request
/// - OPTIONS CORS preflight, 200 with empty body
/// - other   405
///
/// CORS headers are set on every response, errors included. Failed requests
/// are logged by [`ApiError`], so the trace layer's own failure event is off.
pub fn make_router(state: Arc<AppState>) -> Router {
    let config = Arc::clone(&state.config);
    let allow_origin = header_value(&config.cors.allow_origin, "*");
    let allow_headers = header_value(&config.cors.allow_headers, "Content-Type");

    Router::new()
        .route(
            &config.path,
            post(chat::chat)
                .options(chat::preflight)
                .fallback(chat::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            allow_origin,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            allow_headers,
        ))
        .layer(TraceLayer::new_for_http().on_failure(()))
}
