//! GitHub webhook handling.
//!
//! ## Processing Flow
//!
//! ```text
//! raw body + X-Hub-Signature-256 → verify_signature() → serde_json::Value → transform() → OutboundMessage
//! ```

pub mod event;
pub mod pretty;
pub mod signature;
pub mod transform;

pub use event::GithubEvent;
pub use signature::{compute_signature, format_signature_header, verify_signature};
pub use transform::{transform, MessageStatus, OutboundMessage};
