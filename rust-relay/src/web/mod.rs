//! Web server module for receiving GitHub webhooks.
//!
//! This module provides a thin web server that:
//! - Receives webhooks from GitHub
//! - Verifies the HMAC signature
//! - Transforms the event and hands it to a background Telex delivery
//! - Returns 200 OK without waiting for Telex

pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::Config;

pub use handlers::{
    github_webhook, health, AppState, HealthResponse, WebhookError, WebhookResponse,
    HEADER_EVENT, HEADER_SIGNATURE,
};

/// Build the application router.
///
/// `/webhook` accepts bodies up to `Config::max_body_bytes` instead of
/// axum's 2 MB default; large pushes exceed that.
pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(github_webhook).layer(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listening socket for `config.host` and `config.port`.
///
/// The host may be a hostname or a bare IPv6 literal; both are resolved
/// rather than parsed as a socket address.
pub async fn bind(config: &Config) -> Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::github::{compute_signature, format_signature_header};
    use crate::telex::TelexClient;
    use crate::test_utils::{fake_telex, OFFLINE_TELEX_URL};

    const SECRET: &str = "test-secret";

    fn test_state(telex_url: &str) -> AppState {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            github_secret: SECRET.to_string(),
            telex_webhook_url: telex_url.to_string(),
            telex_timeout_ms: 2000,
            max_body_bytes: crate::config::DEFAULT_MAX_BODY_BYTES,
        };
        let telex =
            TelexClient::new(telex_url.to_string(), config.telex_timeout()).unwrap();
        AppState::new(config, telex)
    }

    /// State whose Telex URL refuses connections; delivery fails silently.
    fn offline_state() -> AppState {
        test_state(OFFLINE_TELEX_URL)
    }

    fn webhook_request(event: Option<&str>, signature: Option<&str>, body: &[u8]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json");
        if let Some(event) = event {
            builder = builder.header(HEADER_EVENT, event);
        }
        if let Some(signature) = signature {
            builder = builder.header(HEADER_SIGNATURE, signature);
        }
        builder.body(Body::from(body.to_vec())).unwrap()
    }

    fn sign(body: &[u8], secret: &str) -> String {
        format_signature_header(&compute_signature(body, secret.as_bytes()))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bind_resolves_hostname() {
        let mut config = (*offline_state().config).clone();
        config.host = "localhost".to_string();

        let listener = bind(&config).await.unwrap();

        assert!(listener.local_addr().unwrap().ip().is_loopback());
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_accepts_ip_literal() {
        let mut config = (*offline_state().config).clone();
        config.host = "127.0.0.1".to_string();

        let listener = bind(&config).await.unwrap();

        assert_eq!(listener.local_addr().unwrap().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = router(offline_state());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_missing_signature_returns_400() {
        let app = router(offline_state());
        let body = br#"{"commits": []}"#;

        let response = app
            .oneshot(webhook_request(Some("push"), None, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"detail": "Missing GitHub signature header"})
        );
    }

    #[tokio::test]
    async fn test_wrong_secret_returns_403() {
        let app = router(offline_state());
        let body = br#"{"commits": []}"#;
        let signature = sign(body, "another-secret");

        let response = app
            .oneshot(webhook_request(Some("push"), Some(&signature), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await, json!({"detail": "Invalid signature"}));
    }

    #[tokio::test]
    async fn test_invalid_json_returns_400() {
        let app = router(offline_state());
        let body = b"not json";
        let signature = sign(body, SECRET);

        let response = app
            .oneshot(webhook_request(Some("push"), Some(&signature), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"detail": "Invalid JSON payload"}));
    }

    #[tokio::test]
    async fn test_invalid_json_with_bad_signature_returns_403() {
        let app = router(offline_state());

        let response = app
            .oneshot(webhook_request(Some("push"), Some("sha256=00"), b"not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_webhook_returns_200_when_telex_is_down() {
        let app = router(offline_state());
        let body = br#"{"sender": {"username": "alice"}, "commits": []}"#;
        let signature = sign(body, SECRET);

        let response = app
            .oneshot(webhook_request(Some("push"), Some(&signature), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"detail": "Event processed and forwarded to Telex"})
        );
    }

    #[tokio::test]
    async fn test_push_larger_than_two_megabytes_is_accepted() {
        let commits: Vec<Value> = (0..3000)
            .map(|i| json!({"message": format!("commit {} {}", i, "x".repeat(1000))}))
            .collect();
        let body = serde_json::to_vec(&json!({
            "sender": {"username": "alice"},
            "commits": commits
        }))
        .unwrap();
        assert!(body.len() > 2 * 1024 * 1024);
        let signature = sign(&body, SECRET);

        let response = router(offline_state())
            .oneshot(webhook_request(Some("push"), Some(&signature), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_over_configured_limit_is_rejected() {
        let mut state = offline_state();
        let mut config = (*state.config).clone();
        config.max_body_bytes = 64;
        state.config = std::sync::Arc::new(config);
        let body = serde_json::to_vec(&json!({"padding": "y".repeat(128)})).unwrap();
        let signature = sign(&body, SECRET);

        let response = router(state)
            .oneshot(webhook_request(Some("push"), Some(&signature), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_push_event_is_forwarded_to_telex() {
        let (url, mut rx) = fake_telex(StatusCode::ACCEPTED).await;
        let app = router(test_state(&url));
        let body = br#"{"sender": {"username": "alice"}, "commits": [{"message": "fix bug"}, {"message": "add test"}]}"#;
        let signature = sign(body, SECRET);

        let response = app
            .oneshot(webhook_request(Some("push"), Some(&signature), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let delivered = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            delivered,
            json!({
                "event_name": "push",
                "message": "GitHub Push Event by alice:\n- fix bug\n- add test",
                "status": "success",
                "username": "alice"
            })
        );
    }

    #[tokio::test]
    async fn test_missing_event_header_defaults_to_unknown() {
        let (url, mut rx) = fake_telex(StatusCode::OK).await;
        let app = router(test_state(&url));
        let body = br#"{"zen": "Keep it logically awesome."}"#;
        let signature = sign(body, SECRET);

        let response = app
            .oneshot(webhook_request(None, Some(&signature), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let delivered = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivered["event_name"], "unknown");
        assert_eq!(delivered["username"], "unknown");
        assert_eq!(
            delivered["message"],
            "GitHub Event: unknown\nPayload: {\n  \"zen\": \"Keep it logically awesome.\"\n}"
        );
    }
}
