//! Endpoint payload types and client configuration.
//!
//! Payload structs hold only the endpoint-specific fields; `errcode` and
//! `errmsg` live on [`crate::Envelope`]. Every field is defaulted, and an
//! explicit `null` reads as the default, so that a partial payload next to a
//! non-zero error code still decodes.

use serde::{Deserialize, Deserializer, Serialize};

/// Missing and `null` both decode as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload of `POST /sns/getuserinfo_bycode`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempCodeUserInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_info: SnsUserInfo,
}

/// User identity resolved from a temp auth code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnsUserInfo {
    /// Nickname on DingTalk.
    #[serde(default, deserialize_with = "null_as_default")]
    pub nick: String,

    /// Unique within the developer's enterprise.
    #[serde(default, deserialize_with = "null_as_default", rename = "unionid")]
    pub union_id: String,

    #[serde(default, deserialize_with = "null_as_default", rename = "dingId")]
    pub ding_id: String,

    /// Unique within the current app.
    #[serde(default, deserialize_with = "null_as_default", rename = "openid")]
    pub open_id: String,

    /// Whether the user's main organisation has advanced certification.
    #[serde(default, deserialize_with = "null_as_default")]
    pub main_org_auth_high_level: bool,
}

/// Payload of `GET /gettoken`.
///
/// The endpoint is rate limited; cache the token until `expires_in` elapses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenGrant {
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_token: String,

    /// Lifetime in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires_in: i64,
}

/// Payload of `POST /topapi/user/getbyunionid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionIdLookup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub result: UnionIdResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionIdResult {
    /// 0 = internal employee, 1 = external contact.
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_type: i64,

    #[serde(default, deserialize_with = "null_as_default", rename = "userid")]
    pub user_id: String,
}

/// Payload of `POST /topapi/v2/user/get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub result: UserProfile,
}

/// Employee profile.
///
/// Mobile fields need the contact "phone number" permission; `email` needs
/// the "email and personal info" permission. Without them they come back
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "null_as_default", rename = "unionid")]
    pub union_id: String,

    #[serde(default, deserialize_with = "null_as_default", rename = "userid")]
    pub user_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,

    /// International dialing code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state_code: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub hide_mobile: bool,

    /// Extension number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub telephone: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub job_number: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub work_place: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub remark: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub dept_id_list: Vec<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub dept_order_list: Vec<DeptOrder>,

    /// Free-form extension attributes (JSON string, up to 2000 chars).
    #[serde(default, deserialize_with = "null_as_default")]
    pub extension: String,

    /// Hire date, milliseconds since epoch.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hired_date: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub real_authed: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub senior: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub admin: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub boss: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub leader_in_dept: Vec<DeptLeader>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub role_list: Vec<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeptOrder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dept_id: i64,

    /// Position within the department.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeptLeader {
    #[serde(default, deserialize_with = "null_as_default")]
    pub leader: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub dept_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
}

/// Robot webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Robot send endpoint.
    #[serde(default = "default_webhook_url")]
    pub url: String,

    /// Robot access token.
    #[serde(default)]
    pub token: String,

    /// Signing secret; unsigned when absent.
    #[serde(default)]
    pub secret: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts on transport failure.
    #[serde(default)]
    pub max_retries: u32,
}

/// User API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts on transport failure.
    #[serde(default)]
    pub max_retries: u32,

    /// Language for profile lookups.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_webhook_url() -> String {
    "https://oapi.dingtalk.com/robot/send".to_string()
}

fn default_api_url() -> String {
    "https://oapi.dingtalk.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_language() -> String {
    "zh_CN".to_string()
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: default_webhook_url(),
            token: String::new(),
            secret: None,
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

impl WebhookConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `DINGTALK_ROBOT_URL` | Robot send endpoint |
    /// | `DINGTALK_ROBOT_TOKEN` | Robot access token |
    /// | `DINGTALK_ROBOT_SECRET` | Signing secret |
    /// | `DINGTALK_TIMEOUT` | Request timeout in seconds (default: 30) |
    /// | `DINGTALK_MAX_RETRIES` | Extra attempts on transport failure (default: 0) |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DINGTALK_ROBOT_URL").unwrap_or_else(|_| default_webhook_url()),
            token: std::env::var("DINGTALK_ROBOT_TOKEN").unwrap_or_default(),
            secret: std::env::var("DINGTALK_ROBOT_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            timeout_secs: env_parse("DINGTALK_TIMEOUT").unwrap_or_else(default_timeout),
            max_retries: env_parse("DINGTALK_MAX_RETRIES").unwrap_or(0),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_timeout(),
            max_retries: 0,
            language: default_language(),
        }
    }
}

impl UserConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `DINGTALK_API_URL` | API base URL (default: `https://oapi.dingtalk.com`) |
    /// | `DINGTALK_TIMEOUT` | Request timeout in seconds (default: 30) |
    /// | `DINGTALK_MAX_RETRIES` | Extra attempts on transport failure (default: 0) |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("DINGTALK_API_URL").unwrap_or_else(|_| default_api_url()),
            timeout_secs: env_parse("DINGTALK_TIMEOUT").unwrap_or_else(default_timeout),
            max_retries: env_parse("DINGTALK_MAX_RETRIES").unwrap_or(0),
            language: default_language(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
