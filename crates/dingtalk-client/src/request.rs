//! Request construction.
//!
//! Builders here only read credentials and payloads. They fail with
//! [`DingTalkError::InvalidUrl`] before anything is sent if the base URL
//! is unusable. Query values are percent-encoded exactly once, by `url`.

use std::time::SystemTime;

use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::auth::{AccessToken, AppCredential, WebhookCredential};
use crate::error::{DingTalkError, DingTalkResult};
use crate::message::Message;
use crate::sign::{sign_login_free, sign_webhook};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Owned request description. Cloneable so an attempt can be replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub content_type: &'static str,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Value of a query parameter, decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// URL without the query string (safe to log).
    pub fn endpoint(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

/// Robot send: `POST <base>?access_token=..[&timestamp=..&sign=..]`.
pub fn webhook_send(
    base_url: &str,
    credential: &WebhookCredential,
    message: &Message,
    now: SystemTime,
) -> DingTalkResult<HttpRequest> {
    let mut url = parse_base(base_url)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("access_token", credential.token());
        if let Some(secret) = credential.secret() {
            let signed = sign_webhook(secret, now);
            query.append_pair("timestamp", &signed.timestamp);
            query.append_pair("sign", &signed.signature);
        }
    }

    Ok(HttpRequest {
        method: Method::POST,
        url,
        content_type: CONTENT_TYPE_JSON,
        body: Some(message.to_body()?),
    })
}

#[derive(Serialize)]
struct TempCodeBody<'a> {
    tmp_auth_code: &'a str,
}

/// Temp-code exchange: `POST <url>?accessKey=..&timestamp=..&signature=..`.
pub fn user_info_by_temp_code(
    endpoint: &str,
    tmp_code: &str,
    credential: &AppCredential,
    now: SystemTime,
) -> DingTalkResult<HttpRequest> {
    let signed = sign_login_free(credential.app_secret(), now);
    let url = with_query(
        endpoint,
        &[
            ("accessKey", credential.app_key()),
            ("timestamp", &signed.timestamp),
            ("signature", &signed.signature),
        ],
    )?;
    json_post(
        url,
        &TempCodeBody {
            tmp_auth_code: tmp_code,
        },
    )
}

/// Access token: `GET <url>?appkey=..&appsecret=..`.
pub fn access_token(endpoint: &str, credential: &AppCredential) -> DingTalkResult<HttpRequest> {
    let url = with_query(
        endpoint,
        &[
            ("appkey", credential.app_key()),
            ("appsecret", credential.app_secret()),
        ],
    )?;
    Ok(HttpRequest {
        method: Method::GET,
        url,
        content_type: CONTENT_TYPE_FORM,
        body: None,
    })
}

#[derive(Serialize)]
struct UnionIdBody<'a> {
    unionid: &'a str,
}

/// Union-id lookup: `POST <url>?access_token=..`.
pub fn user_id_by_union_id(
    endpoint: &str,
    union_id: &str,
    token: &AccessToken,
) -> DingTalkResult<HttpRequest> {
    let url = with_query(endpoint, &[("access_token", token.as_str())])?;
    json_post(url, &UnionIdBody { unionid: union_id })
}

#[derive(Serialize)]
struct UserGetBody<'a> {
    userid: &'a str,
    language: &'a str,
}

/// User detail: `POST <url>?access_token=..`.
pub fn user_by_id(
    endpoint: &str,
    user_id: &str,
    language: &str,
    token: &AccessToken,
) -> DingTalkResult<HttpRequest> {
    let url = with_query(endpoint, &[("access_token", token.as_str())])?;
    json_post(
        url,
        &UserGetBody {
            userid: user_id,
            language,
        },
    )
}

fn json_post<B: Serialize>(url: Url, body: &B) -> DingTalkResult<HttpRequest> {
    let body = serde_json::to_vec(body).map_err(|e| DingTalkError::InvalidMessage {
        reason: format!("failed to serialize request body: {}", e),
    })?;
    Ok(HttpRequest {
        method: Method::POST,
        url,
        content_type: CONTENT_TYPE_JSON,
        body: Some(body),
    })
}

fn with_query(base_url: &str, pairs: &[(&str, &str)]) -> DingTalkResult<Url> {
    let mut url = parse_base(base_url)?;
    url.query_pairs_mut().extend_pairs(pairs);
    Ok(url)
}

fn parse_base(base_url: &str) -> DingTalkResult<Url> {
    let url = Url::parse(base_url).map_err(|e| DingTalkError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(DingTalkError::InvalidUrl {
            url: base_url.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::SignedRequest;
    use std::time::{Duration, UNIX_EPOCH};

    const NOW_MS: u64 = 1_600_000_000_000;

    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(NOW_MS)
    }

    #[test]
    fn test_unsigned_webhook_has_no_signature_params() {
        let cred = WebhookCredential::new("tok");
        let req = webhook_send(
            "https://oapi.dingtalk.com/robot/send",
            &cred,
            &Message::text("hello"),
            now(),
        )
        .unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.content_type, "application/json");
        assert_eq!(req.query_param("access_token").as_deref(), Some("tok"));
        assert!(req.query_param("timestamp").is_none());
        assert!(req.query_param("sign").is_none());
        assert_eq!(req.url.query(), Some("access_token=tok"));
    }

    #[test]
    fn test_signed_webhook_query() {
        let cred = WebhookCredential::new("tok").with_secret("s3cr3t");
        let req = webhook_send(
            "https://oapi.dingtalk.com/robot/send",
            &cred,
            &Message::text("hello"),
            now(),
        )
        .unwrap();

        let expected = sign_webhook("s3cr3t", now());
        assert_eq!(req.query_param("timestamp"), Some(NOW_MS.to_string()));
        assert_eq!(req.query_param("sign"), Some(expected.signature.clone()));

        // Raw query carries the escaped form exactly once
        let raw = req.url.query().unwrap();
        assert!(raw.contains(&format!("sign={}", expected.url_escaped_signature())));
        assert_eq!(
            req.body.as_deref(),
            Some(br#"{"msgtype":"text","text":{"content":"hello"}}"#.as_slice())
        );
    }

    #[test]
    fn test_builder_does_not_touch_inputs() {
        let cred = WebhookCredential::new("tok").with_secret("s");
        let msg = Message::text("hello").at_all();
        let (cred_before, msg_before) = (cred.clone(), msg.clone());
        let _ = webhook_send("https://example.com/send", &cred, &msg, now()).unwrap();
        assert_eq!(cred, cred_before);
        assert_eq!(msg, msg_before);
    }

    #[test]
    fn test_malformed_base_url_fails_fast() {
        let cred = WebhookCredential::new("tok");
        let err = webhook_send("not a url", &cred, &Message::text("x"), now()).unwrap_err();
        assert!(matches!(err, DingTalkError::InvalidUrl { .. }));
        assert!(!err.is_retryable());

        let err =
            webhook_send("mailto:ops@example.com", &cred, &Message::text("x"), now()).unwrap_err();
        assert!(matches!(err, DingTalkError::InvalidUrl { .. }));
    }

    #[test]
    fn test_temp_code_request() {
        let cred = AppCredential::new("dingoa123", "app-secret");
        let req = user_info_by_temp_code(
            "https://oapi.dingtalk.com/sns/getuserinfo_bycode",
            "code\"with-quote",
            &cred,
            now(),
        )
        .unwrap();

        let signed: SignedRequest = sign_login_free("app-secret", now());
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.query_param("accessKey").as_deref(), Some("dingoa123"));
        assert_eq!(req.query_param("timestamp"), Some(signed.timestamp));
        assert_eq!(req.query_param("signature"), Some(signed.signature));

        let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["tmp_auth_code"], "code\"with-quote");
    }

    #[test]
    fn test_access_token_request() {
        let cred = AppCredential::new("key", "se&cret");
        let req = access_token("https://oapi.dingtalk.com/gettoken", &cred).unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.content_type, CONTENT_TYPE_FORM);
        assert!(req.body.is_none());
        assert_eq!(req.query_param("appkey").as_deref(), Some("key"));
        assert_eq!(req.query_param("appsecret").as_deref(), Some("se&cret"));
        assert_eq!(req.endpoint(), "https://oapi.dingtalk.com/gettoken");
    }

    #[test]
    fn test_user_lookup_bodies() {
        let token = AccessToken::new("at-1");

        let req = user_id_by_union_id("https://h/topapi/user/getbyunionid", "u-1", &token)
            .unwrap();
        assert_eq!(req.query_param("access_token").as_deref(), Some("at-1"));
        assert_eq!(req.body.as_deref(), Some(br#"{"unionid":"u-1"}"#.as_slice()));

        let req = user_by_id("https://h/topapi/v2/user/get", "manager1", "zh_CN", &token).unwrap();
        assert_eq!(
            req.body.as_deref(),
            Some(br#"{"userid":"manager1","language":"zh_CN"}"#.as_slice())
        );
    }
}
