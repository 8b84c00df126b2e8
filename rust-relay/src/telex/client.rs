//! HTTP client for Telex channel webhooks.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::github::OutboundMessage;

/// Errors returned by a single delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request could not be sent or timed out.
    #[error("telex request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Telex answered with a non-success status.
    #[error("telex rejected message with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Telex webhook client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct TelexClient {
    inner: Arc<TelexClientInner>,
}

struct TelexClientInner {
    http: Client,
    webhook_url: String,
    timeout: Duration,
}

impl TelexClient {
    /// Create a client posting to `webhook_url`.
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .pool_max_idle_per_host(16)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            inner: Arc::new(TelexClientInner {
                http,
                webhook_url,
                timeout,
            }),
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.inner.webhook_url
    }

    /// Post one message to Telex and wait for the response.
    pub async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        info!(
            event_name = %message.event_name,
            username = %message.username,
            message_length = message.message.len(),
            "telex_delivery_starting"
        );

        let response = self
            .inner
            .http
            .post(&self.inner.webhook_url)
            .timeout(self.inner.timeout)
            .header("Accept", "application/json")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }

        info!(
            event_name = %message.event_name,
            status_code = status.as_u16(),
            "telex_delivery_complete"
        );

        Ok(())
    }

    /// Deliver `message` on a detached task.
    ///
    /// Failures are logged and go no further. The handle is only useful to
    /// callers that want to wait, such as tests; request handlers drop it.
    pub fn forward_in_background(&self, message: OutboundMessage) -> JoinHandle<()> {
        let client = self.clone();

        tokio::spawn(async move {
            match client.send(&message).await {
                Ok(()) => {}
                Err(DeliveryError::Transport(e)) if e.is_timeout() => {
                    error!(
                        event_name = %message.event_name,
                        timeout_seconds = client.inner.timeout.as_secs_f64(),
                        error = %e,
                        "telex_delivery_timeout"
                    );
                }
                Err(e) => {
                    error!(
                        event_name = %message.event_name,
                        error = %e,
                        "telex_delivery_failed"
                    );
                }
            }
        })
    }
}
