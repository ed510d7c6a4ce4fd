//! User identity client.
//!
//! | Operation | Endpoint | Credential |
//! |-----------|----------|------------|
//! | [`UserClient::get_user_info_by_temp_code`] | `POST /sns/getuserinfo_bycode` | login app `appId`/`appSecret` (signed) |
//! | [`UserClient::get_access_token`] | `GET /gettoken` | app key/secret |
//! | [`UserClient::get_user_id_by_union_id`] | `POST /topapi/user/getbyunionid` | access token |
//! | [`UserClient::get_user_by_id`] | `POST /topapi/v2/user/get` | access token |
//!
//! Each operation returns the checked envelope. A non-zero `errcode` becomes
//! [`crate::DingTalkError::Api`].

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::{AccessToken, AppCredential};
use crate::dispatch::{Dispatcher, RetryPolicy};
use crate::envelope::Envelope;
use crate::error::DingTalkResult;
use crate::request::{self, HttpRequest};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{AccessTokenGrant, TempCodeUserInfo, UnionIdLookup, UserConfig, UserDetail};

const TEMP_CODE_PATH: &str = "sns/getuserinfo_bycode";
const GET_TOKEN_PATH: &str = "gettoken";
const UNION_ID_PATH: &str = "topapi/user/getbyunionid";
const USER_GET_PATH: &str = "topapi/v2/user/get";

/// Client for the user identity endpoints.
#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
    language: String,
    dispatcher: Dispatcher,
}

impl UserClient {
    pub fn new(config: UserConfig) -> DingTalkResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: UserConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language,
            dispatcher: Dispatcher::new(transport, RetryPolicy::immediate(config.max_retries)),
        }
    }

    pub fn from_env() -> DingTalkResult<Self> {
        Self::new(UserConfig::from_env())
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.dispatcher = self.dispatcher.with_retry(retry);
        self
    }

    /// Resolve a temp auth code from QR/login-free sign-in to the user's
    /// identity. The credential is the login app's `appId`/`appSecret`.
    pub async fn get_user_info_by_temp_code(
        &self,
        tmp_code: &str,
        credential: &AppCredential,
    ) -> DingTalkResult<Envelope<TempCodeUserInfo>> {
        let request = request::user_info_by_temp_code(
            &self.endpoint(TEMP_CODE_PATH),
            tmp_code,
            credential,
            SystemTime::now(),
        )?;
        self.call(&request).await
    }

    /// Fetch an app access token. Callers should cache it for `expires_in`.
    pub async fn get_access_token(
        &self,
        credential: &AppCredential,
    ) -> DingTalkResult<Envelope<AccessTokenGrant>> {
        let request = request::access_token(&self.endpoint(GET_TOKEN_PATH), credential)?;
        self.call(&request).await
    }

    /// Map a union id to the enterprise user id.
    pub async fn get_user_id_by_union_id(
        &self,
        union_id: &str,
        token: &AccessToken,
    ) -> DingTalkResult<Envelope<UnionIdLookup>> {
        let request =
            request::user_id_by_union_id(&self.endpoint(UNION_ID_PATH), union_id, token)?;
        self.call(&request).await
    }

    /// Fetch the full profile of an enterprise user.
    pub async fn get_user_by_id(
        &self,
        user_id: &str,
        token: &AccessToken,
    ) -> DingTalkResult<Envelope<UserDetail>> {
        let request = request::user_by_id(
            &self.endpoint(USER_GET_PATH),
            user_id,
            &self.language,
            token,
        )?;
        self.call(&request).await
    }

    /// On a non-zero `errcode` the partial payload rides on the error; see
    /// [`crate::DingTalkError::api_payload`].
    async fn call<T>(&self, request: &HttpRequest) -> DingTalkResult<Envelope<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        let envelope = self.dispatcher.send::<T>(request).await?;
        debug!(
            endpoint = %request.endpoint(),
            errcode = envelope.error_code,
            "user api response"
        );
        envelope.check()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
