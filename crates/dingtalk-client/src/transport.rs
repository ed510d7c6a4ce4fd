//! HTTP transport seam.
//!
//! The dispatcher talks to the network only through [`Transport`], so TLS,
//! timeout and proxy policy belong to whoever builds the transport. Tests
//! plug in stubs; production uses [`ReqwestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};

use crate::error::{DingTalkError, DingTalkResult};
use crate::request::HttpRequest;

/// User agent for platform requests.
pub const USER_AGENT_VALUE: &str = concat!("dingtalk-client/", env!("CARGO_PKG_VERSION"));

/// Raw response: status plus body text. Decoding is the dispatcher's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Execute one HTTP request. Errors are transport failures.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: &HttpRequest) -> DingTalkResult<HttpResponse>;
}

/// Default transport on `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the given request timeout.
    pub fn new(timeout: Duration) -> DingTalkResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| DingTalkError::Network {
                message: format!("failed to create HTTP client: {}", e.without_url()),
            })?;

        Ok(Self { client })
    }

    /// Wrap a caller-configured client (proxy, custom TLS roots, ...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> DingTalkResult<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(CONTENT_TYPE, request.content_type);

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| DingTalkError::Network {
            message: format!("failed to read response body: {}", e.without_url()),
        })?;

        Ok(HttpResponse { status, body })
    }
}
