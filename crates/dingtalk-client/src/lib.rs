//! DingTalk robot webhook and user identity client.
//!
//! This crate provides:
//!
//! - Robot messages (text, link, markdown, action card, feed card) with
//!   optional mentions
//! - HMAC-SHA256 request signing for robots with a secret
//! - Bounded retry on transport failures, never on platform error codes
//! - User identity lookups (temp auth code, access token, union id, user id)
//!
//! # Quick Start
//!
//! ```no_run
//! use dingtalk_client::{Message, Robot, WebhookConfig};
//!
//! # async fn example() -> Result<(), dingtalk_client::DingTalkError> {
//! let config = WebhookConfig::default()
//!     .with_token("robot-access-token")
//!     .with_secret("SEC...");
//! let robot = Robot::new(config)?;
//!
//! robot
//!     .send_with_retry(&Message::text("deploy finished").at_all(), 2)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Transport and decode failures ([`DingTalkError::Network`],
//! [`DingTalkError::Decode`]) are retried up to the configured bound. A
//! decoded response with a non-zero `errcode` is returned immediately as
//! [`DingTalkError::Api`] with the platform's code and message.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DINGTALK_ROBOT_URL` | Robot send endpoint (default: `https://oapi.dingtalk.com/robot/send`) |
//! | `DINGTALK_ROBOT_TOKEN` | Robot access token |
//! | `DINGTALK_ROBOT_SECRET` | Robot signing secret |
//! | `DINGTALK_API_URL` | User API base URL (default: `https://oapi.dingtalk.com`) |
//! | `DINGTALK_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `DINGTALK_MAX_RETRIES` | Extra attempts on transport failure (default: 0) |

pub mod auth;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod message;
pub mod request;
pub mod robot;
pub mod sign;
pub mod transport;
pub mod types;
pub mod user;

// Re-export main types
pub use auth::{AccessToken, AppCredential, WebhookCredential};
pub use dispatch::{Backoff, Dispatcher, RetryPolicy};
pub use envelope::{Envelope, SendReceipt};
pub use error::{DingTalkError, DingTalkResult};
pub use message::{
    ActionCard, At, Button, ButtonOrientation, FeedCard, FeedLink, Link, Markdown, Message,
    MessageBody, MessageKind, Text,
};
pub use request::HttpRequest;
pub use robot::Robot;
pub use sign::{sign_login_free, sign_webhook, SignedRequest};
pub use transport::{HttpResponse, ReqwestTransport, Transport, USER_AGENT_VALUE};
pub use types::{
    AccessTokenGrant, DeptLeader, DeptOrder, Role, SnsUserInfo, TempCodeUserInfo, UnionIdLookup,
    UnionIdResult, UserConfig, UserDetail, UserProfile, WebhookConfig,
};
pub use user::UserClient;
