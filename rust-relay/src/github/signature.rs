//! GitHub webhook signature verification.
//!
//! GitHub signs webhook bodies using HMAC-SHA256 with the webhook secret and
//! sends the result in the `X-Hub-Signature-256` header as `sha256=<hex>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the raw HMAC-SHA256 of `body` keyed with `secret`.
pub fn compute_signature(body: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(body);
    mac.finalize().into_bytes().to_vec()
}

/// Format a raw signature as a GitHub header value (`sha256=<lowercase hex>`).
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(signature))
}

/// Verify a GitHub webhook signature.
///
/// The expected header value is rebuilt from the body and secret and compared
/// to the received one in constant time. Empty headers, other algorithms and
/// anything that is not exactly `sha256=` followed by the lowercase hex digest
/// are rejected.
///
/// # Arguments
///
/// * `body` - The raw request body, exactly as received
/// * `signature_header` - The value of the `X-Hub-Signature-256` header
/// * `secret` - The webhook secret configured in GitHub
pub fn verify_signature(body: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    if signature_header.is_empty() {
        warn!("github_signature_empty");
        return false;
    }

    let expected = format_signature_header(&compute_signature(body, secret));

    // Slices of different lengths compare unequal without inspecting content.
    let valid: bool = expected
        .as_bytes()
        .ct_eq(signature_header.as_bytes())
        .into();

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature_header.len(),
            has_prefix = signature_header.starts_with(SIGNATURE_PREFIX),
            "github_signature_mismatch"
        );
    }

    valid
}
