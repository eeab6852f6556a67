//! Webhook delivery authentication (HMAC-SHA256).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify an `X-Hub-Signature-256` style header against the exact raw bytes
/// of the request body.
///
/// The body must be the unparsed byte sequence as received: re-serializing
/// the JSON would reorder keys or change whitespace and no longer match the
/// sender's digest. Comparison is constant-time.
pub fn verify(raw_body: &[u8], provided: &str, secret: &str) -> bool {
    let Some(provided_hex) = provided.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };

    let expected = signature_hex(raw_body, secret);
    constant_time_eq(
        expected.as_bytes(),
        provided_hex.to_ascii_lowercase().as_bytes(),
    )
}

/// Compute the full `sha256=<hex>` header value for a body. The counterpart
/// of [`verify`], useful for self-tests and for signing simulated deliveries.
pub fn signature_of(raw_body: &[u8], secret: &str) -> String {
    format!("{SIGNATURE_PREFIX}{}", signature_hex(raw_body, secret))
}

fn signature_hex(raw_body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(raw_body);
    hex_digest(&mac.finalize().into_bytes())
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Constant-time comparison of two byte slices.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
