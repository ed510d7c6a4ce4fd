//! Credentials for the two endpoint families.
//!
//! - [`WebhookCredential`]: robot access token plus optional signing secret.
//! - [`AppCredential`]: app key/secret pair (`gettoken`, temp-code exchange).
//! - [`AccessToken`]: token returned by `gettoken`, used by user lookups.
//!
//! All of them are immutable once built and redact secrets in `Debug`.

use std::fmt;

/// Robot webhook credential.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookCredential {
    token: String,
    secret: Option<String>,
}

impl WebhookCredential {
    /// Unsigned credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: None,
        }
    }

    /// Attach the signing secret. An empty secret means unsigned.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.secret = if secret.is_empty() { None } else { Some(secret) };
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.secret.is_some()
    }
}

impl fmt::Debug for WebhookCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookCredential")
            .field("token", &redact(&self.token))
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// App key and secret.
///
/// For the temp-code exchange the key is the login app's `appId`.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredential {
    app_key: String,
    app_secret: String,
}

impl AppCredential {
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }
}

impl fmt::Debug for AppCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredential")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

/// Access token for the user endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&redact(&self.0)).finish()
    }
}

/// Keep a short prefix for log correlation.
fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    if prefix.len() == value.len() {
        "[REDACTED]".to_string()
    } else {
        format!("{}…[REDACTED]", prefix)
    }
}
