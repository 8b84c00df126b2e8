//! ghtelex - GitHub to Telex webhook relay.
//!
//! This library provides the modules behind the `ghtelex-web` binary:
//! - `github`: signature verification and event-to-message transformation
//! - `telex`: background delivery of messages to a Telex channel webhook
//! - `web`: the axum router exposing `POST /webhook` and `GET /health`
//!
//! ## Architecture
//!
//! ```text
//! GitHub → POST /webhook → verify → transform → (detached task) → Telex
//! ```

pub mod config;
pub mod github;
pub mod telex;
pub mod web;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use github::{transform, verify_signature, GithubEvent, OutboundMessage};
pub use telex::TelexClient;
pub use web::{router, AppState};
