//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup and shared read-only.

use std::env;
use std::time::Duration;

use anyhow::{bail, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web server binds to
    pub host: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret configured on the GitHub webhook
    pub github_secret: String,

    /// Telex channel webhook URL that receives forwarded messages
    pub telex_webhook_url: String,

    /// Timeout in milliseconds for a single Telex delivery
    pub telex_timeout_ms: u64,

    /// Largest webhook body accepted, in bytes
    pub max_body_bytes: usize,
}

/// GitHub caps webhook payloads at 25 MB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            github_secret: env::var("GITHUB_WEBHOOK_SECRET").unwrap_or_default(),

            telex_webhook_url: env::var("TELEX_WEBHOOK_URL").unwrap_or_default(),

            telex_timeout_ms: env::var("TELEX_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            max_body_bytes: env::var("WEBHOOK_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Reject configurations the relay cannot run with.
    ///
    /// An empty secret would make every body signed with an empty key valid.
    pub fn validate(&self) -> Result<()> {
        if self.github_secret.trim().is_empty() {
            bail!("GITHUB_WEBHOOK_SECRET must be set");
        }
        if self.telex_webhook_url.trim().is_empty() {
            bail!("TELEX_WEBHOOK_URL must be set");
        }
        Ok(())
    }

    pub fn telex_timeout(&self) -> Duration {
        Duration::from_millis(self.telex_timeout_ms)
    }
}
