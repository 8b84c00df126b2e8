//! Webhook endpoint handlers.
//!
//! The GitHub handler only:
//! 1. Verifies the signature
//! 2. Parses and transforms the payload
//! 3. Schedules delivery to Telex and returns immediately

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::github::{transform, verify_signature, GithubEvent};
use crate::telex::TelexClient;
use crate::Config;

/// Header carrying the HMAC-SHA256 signature of the body.
pub const HEADER_SIGNATURE: &str = "x-hub-signature-256";
/// Header naming the GitHub event type.
pub const HEADER_EVENT: &str = "x-github-event";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub telex: TelexClient,
}

impl AppState {
    pub fn new(config: Config, telex: TelexClient) -> Self {
        Self {
            config: Arc::new(config),
            telex,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// GitHub Webhook
// =============================================================================

/// Body of every webhook response, success or error.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub detail: String,
}

/// Reasons a webhook is rejected before anything is forwarded.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing GitHub signature header")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid JSON payload")]
    MalformedPayload(#[source] serde_json::Error),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(WebhookResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// GitHub webhook endpoint.
///
/// Responds 400 when the signature header is missing or the body is not
/// JSON, 403 when the signature does not match, and 200 once delivery to
/// Telex has been scheduled. Delivery outcome is never reported back.
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let event = header_value(&headers, HEADER_EVENT)
        .map(GithubEvent::from_header)
        .unwrap_or_default();

    info!(
        event = %event,
        body_length = body.len(),
        "github_webhook_received"
    );

    let Some(signature) = header_value(&headers, HEADER_SIGNATURE) else {
        warn!(event = %event, "github_signature_missing");
        return Err(WebhookError::MissingSignature);
    };

    if !verify_signature(&body, signature, state.config.github_secret.as_bytes()) {
        warn!(event = %event, "github_signature_invalid");
        return Err(WebhookError::InvalidSignature);
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(event = %event, error = %e, "github_payload_invalid_json");
        WebhookError::MalformedPayload(e)
    })?;

    let message = transform(&event, &payload);

    // Detached: the response does not wait for Telex.
    drop(state.telex.forward_in_background(message));

    info!(event = %event, "github_event_forwarded");

    Ok(Json(WebhookResponse {
        detail: "Event processed and forwarded to Telex".to_string(),
    }))
}

/// Non-empty header value as a string; unreadable values count as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
