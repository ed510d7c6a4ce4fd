//! Robot webhook client.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::debug;

use crate::auth::WebhookCredential;
use crate::dispatch::{Dispatcher, RetryPolicy};
use crate::envelope::{Envelope, SendReceipt};
use crate::error::{DingTalkError, DingTalkResult};
use crate::message::Message;
use crate::request::webhook_send;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::WebhookConfig;

/// Sends messages to one chat through its custom robot.
#[derive(Debug, Clone)]
pub struct Robot {
    url: String,
    credential: WebhookCredential,
    dispatcher: Dispatcher,
}

impl Robot {
    pub fn new(config: WebhookConfig) -> DingTalkResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Use a caller-supplied transport (proxy, TLS policy, test stub).
    pub fn with_transport(
        config: WebhookConfig,
        transport: Arc<dyn Transport>,
    ) -> DingTalkResult<Self> {
        if config.token.is_empty() {
            return Err(DingTalkError::Config {
                message: "robot access token is empty".to_string(),
            });
        }

        let mut credential = WebhookCredential::new(config.token);
        if let Some(secret) = config.secret {
            credential = credential.with_secret(secret);
        }

        Ok(Self {
            url: config.url,
            credential,
            dispatcher: Dispatcher::new(transport, RetryPolicy::immediate(config.max_retries)),
        })
    }

    pub fn from_env() -> DingTalkResult<Self> {
        Self::new(WebhookConfig::from_env())
    }

    /// Replace the retry policy (e.g. to add backoff).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.dispatcher = self.dispatcher.with_retry(retry);
        self
    }

    /// Send with the configured retry policy.
    pub async fn send(&self, message: &Message) -> DingTalkResult<Envelope<SendReceipt>> {
        self.dispatch(message, &self.dispatcher).await
    }

    /// Send with `extra_attempts` immediate retries on transport failure.
    pub async fn send_with_retry(
        &self,
        message: &Message,
        extra_attempts: u32,
    ) -> DingTalkResult<Envelope<SendReceipt>> {
        let policy = RetryPolicy {
            max_retries: extra_attempts,
            ..self.dispatcher.retry_policy()
        };
        self.dispatch(message, &self.dispatcher.with_retry(policy))
            .await
    }

    async fn dispatch(
        &self,
        message: &Message,
        dispatcher: &Dispatcher,
    ) -> DingTalkResult<Envelope<SendReceipt>> {
        message.validate()?;
        let request = webhook_send(&self.url, &self.credential, message, SystemTime::now())?;

        debug!(
            msgtype = %message.kind(),
            signed = self.credential.is_signed(),
            "sending robot message"
        );

        dispatcher.send::<SendReceipt>(&request).await?.check()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_signed(&self) -> bool {
        self.credential.is_signed()
    }
}
