//! Request signing.
//!
//! DingTalk uses two HMAC-SHA256 schemes, both keyed with a secret and
//! stamped with the current time in milliseconds:
//!
//! | Scheme | Message | Query parameters |
//! |--------|---------|------------------|
//! | Robot webhook | `"{timestamp}\n{secret}"` | `timestamp`, `sign` |
//! | Login-free (temp code) | `"{timestamp}"` | `timestamp`, `signature` |
//!
//! The signature is standard base64 and must be escaped before it is placed
//! in a query string.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Timestamp and signature for a single request. Never reuse across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Milliseconds since the Unix epoch, as a decimal string.
    pub timestamp: String,

    /// Base64-encoded HMAC-SHA256 digest.
    pub signature: String,
}

impl SignedRequest {
    /// Signature escaped for use inside a URL query component.
    pub fn url_escaped_signature(&self) -> String {
        url::form_urlencoded::byte_serialize(self.signature.as_bytes()).collect()
    }
}

/// Sign a robot webhook request.
pub fn sign_webhook(secret: &str, now: SystemTime) -> SignedRequest {
    let timestamp = timestamp_millis(now);
    let message = format!("{}\n{}", timestamp, secret);
    let signature = hmac_base64(secret.as_bytes(), message.as_bytes());
    SignedRequest {
        timestamp,
        signature,
    }
}

/// Sign a login-free request (temp auth code exchange).
pub fn sign_login_free(app_secret: &str, now: SystemTime) -> SignedRequest {
    let timestamp = timestamp_millis(now);
    let signature = hmac_base64(app_secret.as_bytes(), timestamp.as_bytes());
    SignedRequest {
        timestamp,
        signature,
    }
}

/// Milliseconds since the Unix epoch. Times before the epoch clamp to `0`.
pub fn timestamp_millis(now: SystemTime) -> String {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}

fn hmac_base64(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    STANDARD.encode(mac.finalize().into_bytes())
}
