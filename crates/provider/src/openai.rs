//! `OpenAI` client for the Responses and Chat Completions APIs.
//!
//! Auth: `Authorization: Bearer {key}`. The body is forwarded as built by the
//! translator; the response body is returned as parsed JSON.

use crate::http_util::build_http_client;
use async_trait::async_trait;
use chatrelay_config::ProviderConfig;
use chatrelay_types::{Credentials, Endpoint, ProviderClient, RelayError, traits::Result};
use reqwest::{Client, header};
use serde_json::Value;

/// Provider client for `OpenAI`-compatible APIs.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client for `base_url` using the given HTTP client.
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Creates a client from provider configuration, honouring `proxy_url`
    /// and `timeout_secs`.
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        let http = build_http_client(config.proxy_url.as_deref(), config.timeout_secs);
        Self::new(http, config.base_url.clone())
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    async fn send(
        &self,
        endpoint: Endpoint,
        payload: Value,
        credentials: &Credentials,
    ) -> Result<Value> {
        let url = endpoint.url(&self.base_url);
        tracing::debug!(url = %url, "sending provider request");

        let resp = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, credentials.bearer())
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Option<(String, HeaderMap, Value)>>>;

    /// Starts a fake provider that answers every endpoint with `status` and `body`.
    async fn spawn_upstream(status: StatusCode, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(None));
        let handler = |route: &'static str| {
            let seen = Arc::clone(&seen);
            move |headers: HeaderMap, Json(req): Json<Value>| {
                *seen.lock().unwrap() = Some((route.to_string(), headers, req));
                std::future::ready((status, [(header::CONTENT_TYPE, "application/json")], body))
            }
        };
        let app = Router::new()
            .route("/v1/responses", post(handler("responses")))
            .route("/v1/chat/completions", post(handler("chat")));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), seen)
    }

    /// Ignores any system proxy so requests reach the in-process server.
    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn creds() -> Credentials {
        Credentials::new("sk-test").unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_json_and_sends_bearer() {
        let (base, seen) = spawn_upstream(StatusCode::OK, r#"{"output_text":"hello"}"#).await;
        let client = OpenAiClient::new(local_client(), base);

        let payload = json!({"model": "gpt-4.1-mini", "input": [{"role": "user", "content": "hi"}]});
        let res = client
            .send(Endpoint::Responses, payload.clone(), &creds())
            .await
            .unwrap();
        assert_eq!(res["output_text"], "hello");

        let (route, headers, received) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(route, "responses");
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert!(
            headers["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn test_chat_completions_path() {
        let (base, seen) = spawn_upstream(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"hey"}}]}"#,
        )
        .await;
        let client = OpenAiClient::new(local_client(), base);
        let res = client
            .send(Endpoint::ChatCompletions, json!({"model": "m", "messages": []}), &creds())
            .await
            .unwrap();
        assert_eq!(res["choices"][0]["message"]["content"], "hey");
        assert_eq!(seen.lock().unwrap().as_ref().unwrap().0, "chat");
    }

    #[tokio::test]
    async fn test_non_success_is_upstream_error() {
        let (base, _) = spawn_upstream(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"rate limited"}}"#,
        )
        .await;
        let client = OpenAiClient::new(local_client(), base);
        let err = client
            .send(Endpoint::Responses, json!({}), &creds())
            .await
            .unwrap_err();
        match err {
            RelayError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limited"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_is_serialization_error() {
        let (base, _) = spawn_upstream(StatusCode::OK, "<html>gateway</html>").await;
        let client = OpenAiClient::new(local_client(), base);
        let err = client
            .send(Endpoint::Responses, json!({}), &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OpenAiClient::new(local_client(), format!("http://{addr}/v1"));
        let err = client
            .send(Endpoint::Responses, json!({}), &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Http(_)));
    }

    /// Accepts connections and never answers.
    async fn spawn_stalled() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((sock, _)) = listener.accept().await {
                held.push(sock);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_from_config_routes_through_proxy() {
        let (upstream, seen) = spawn_upstream(StatusCode::OK, r#"{"output_text":"proxied"}"#).await;
        let config = ProviderConfig {
            base_url: "http://provider.invalid/v1".into(),
            proxy_url: Some(upstream.trim_end_matches("/v1").to_string()),
            ..Default::default()
        };
        let res = OpenAiClient::from_config(&config)
            .send(Endpoint::Responses, json!({"model": "m"}), &creds())
            .await
            .unwrap();
        assert_eq!(res["output_text"], "proxied");
        assert_eq!(seen.lock().unwrap().as_ref().unwrap().0, "responses");
    }

    #[tokio::test]
    async fn test_from_config_timeout_is_http_error() {
        let config = ProviderConfig {
            base_url: "http://provider.invalid/v1".into(),
            proxy_url: Some(spawn_stalled().await),
            timeout_secs: Some(1),
            ..Default::default()
        };
        let err = OpenAiClient::from_config(&config)
            .send(Endpoint::Responses, json!({}), &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Http(_)));
    }
}
