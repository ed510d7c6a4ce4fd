//! Response envelope and its interpretation.
//!
//! Every DingTalk response carries `errcode`/`errmsg` next to the
//! endpoint-specific fields. `errcode == 0` is business success; anything
//! else becomes [`DingTalkError::Api`] with code, message and any partial
//! payload preserved.
//! Interpretation only happens after transport and decode have succeeded.

use serde::{Deserialize, Serialize};

use crate::error::{DingTalkError, DingTalkResult};

/// Decoded response: error code, message and endpoint payload.
///
/// The payload is flattened, so its fields sit beside `errcode`/`errmsg` in
/// the JSON body. Payload types default every field, which lets a response
/// with a non-zero code and a partial (or missing) payload still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "errcode")]
    pub error_code: i64,

    #[serde(rename = "errmsg", default)]
    pub error_message: String,

    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }
}

impl<T: Serialize> Envelope<T> {
    /// Keep the envelope on success, otherwise turn it into a business error.
    ///
    /// The payload travels with the error; read it back with
    /// [`DingTalkError::api_payload`].
    pub fn check(self) -> DingTalkResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let payload = serde_json::to_value(&self.payload)
            .ok()
            .filter(|value| !matches!(value, serde_json::Value::Object(map) if map.is_empty()));

        Err(DingTalkError::Api {
            code: self.error_code,
            message: self.error_message,
            payload,
        })
    }

    /// Like [`Envelope::check`], but yields only the payload.
    pub fn into_payload(self) -> DingTalkResult<T> {
        self.check().map(|envelope| envelope.payload)
    }
}

/// Payload of a robot send. The platform returns nothing beyond the envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {}

/// Decode a response body into an envelope.
pub(crate) fn decode<T>(body: &str) -> DingTalkResult<Envelope<T>>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| DingTalkError::Decode {
        message: format!("failed to parse response envelope: {}", e),
    })
}
