//! Error types for the DingTalk client.

/// Client errors.
///
/// Construction errors (`InvalidUrl`, `InvalidMessage`, `Config`) are raised
/// before anything is sent. `Network` and `Decode` are attempt failures and
/// are retried by the dispatcher. `Api` is a business error reported by the
/// platform in a well-formed envelope and is never retried.
#[derive(Debug, thiserror::Error)]
pub enum DingTalkError {
    /// Base URL could not be parsed or cannot carry a query string.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Message is not valid for its kind (e.g. a mention on a feed card).
    #[error("invalid message: {reason}")]
    InvalidMessage { reason: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Network error (connect, timeout, TLS, non-2xx without an envelope).
    #[error("network error: {message}")]
    Network { message: String },

    /// Response body is not the expected JSON envelope.
    #[error("invalid response: {message}")]
    Decode { message: String },

    /// Platform returned a non-zero `errcode`.
    ///
    /// `payload` holds whatever endpoint fields came back next to the error
    /// code (e.g. `request_id`), or `None` when there were none.
    #[error("<{code}>: {message}")]
    Api {
        code: i64,
        message: String,
        payload: Option<serde_json::Value>,
    },
}

impl DingTalkError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidUrl { .. } => 1,
            Self::InvalidMessage { .. } => 1,
            Self::Config { .. } => 1,

            Self::Api { .. } => 3,

            // Network/transient
            Self::Network { .. } => 5,
            Self::Decode { .. } => 5,
        }
    }

    /// Whether the error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Decode { .. })
    }

    /// Platform error code, for business errors only.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Endpoint payload returned alongside a business error, decoded as `T`.
    pub fn api_payload<T>(&self) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match self {
            Self::Api {
                payload: Some(value),
                ..
            } => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DingTalkError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries credentials in its query (appsecret, access_token, sign)
        Self::Network {
            message: err.without_url().to_string(),
        }
    }
}

/// Result type for client operations.
pub type DingTalkResult<T> = Result<T, DingTalkError>;
