//! Dispatch: send, decode, retry.
//!
//! Retries cover attempt failures only (network errors and bodies that do
//! not decode as an envelope). A decoded envelope is returned as-is, even
//! with a non-zero `errcode`: replaying the same request will not change a
//! business error. Attempts run sequentially on the caller's task.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::envelope::{decode, Envelope};
use crate::error::{DingTalkError, DingTalkResult};
use crate::request::HttpRequest;
use crate::transport::{HttpResponse, Transport};

/// Delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,

    /// `base * 2^(retry-1)`, capped, with full jitter.
    Exponential { base: Duration, cap: Duration },
}

impl Backoff {
    fn delay(&self, retry: u32) -> Duration {
        use rand::Rng;

        match *self {
            Self::None => Duration::ZERO,
            Self::Exponential { base, cap } => {
                let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
                let ceiling = base.saturating_mul(factor).min(cap);
                let jittered_ms = rand::thread_rng().gen_range(0..=ceiling.as_millis() as u64);
                Duration::from_millis(jittered_ms)
            }
        }
    }
}

/// Bounded retry: total attempts are `1 + max_retries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Single attempt.
    pub fn none() -> Self {
        Self::default()
    }

    /// `max_retries` extra attempts with no delay.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Sends built requests through a transport and decodes envelopes.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Same transport, different retry policy.
    pub fn with_retry(&self, retry: RetryPolicy) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            retry,
        }
    }

    /// One attempt: transport error, decode error, or decoded envelope.
    pub async fn send_once<T>(&self, request: &HttpRequest) -> DingTalkResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        debug!(
            method = %request.method,
            endpoint = %request.endpoint(),
            "sending request"
        );

        let response = self.transport.execute(request).await?;
        interpret_response(response)
    }

    /// Up to `1 + max_retries` attempts; the last attempt error is returned.
    pub async fn send<T>(&self, request: &HttpRequest) -> DingTalkResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let mut retries = 0;
        let max_retries = self.retry.max_retries;

        loop {
            match self.send_once(request).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) if e.is_retryable() && retries < max_retries => {
                    retries += 1;
                    let backoff = self.retry.backoff.delay(retries);

                    warn!(
                        error = %e,
                        retry = retries,
                        max_retries = max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "retrying request"
                    );

                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// The platform reports business errors in the body, sometimes with a
/// non-2xx status. Only a body that fails to decode is an attempt failure.
fn interpret_response<T>(response: HttpResponse) -> DingTalkResult<Envelope<T>>
where
    T: DeserializeOwned,
{
    match decode(&response.body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !response.is_success() => {
            let snippet: String = response.body.chars().take(200).collect();
            Err(DingTalkError::Network {
                message: format!("HTTP {}: {}", response.status, snippet),
            })
        }
        Err(e) => Err(e),
    }
}
