//! HTTP implementation of the backend boundary.
//!
//! Thin `reqwest` wrapper. Envelope interpretation lives in the pure
//! `parse_envelope` for testability.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{
    ApiEnvelope, Backend, BackendError, LoginGrant, LoginRequest, RecruiterRegisterRequest, Registration,
    TalentRegisterRequest,
};
use crate::config::{SessionConfig, SessionTimeouts};
use crate::profile::UserProfile;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_TALENT_PATH: &str = "/auth/register/talent";
const REGISTER_RECRUITER_PATH: &str = "/auth/register/recruiter";
const LOGOUT_PATH: &str = "/auth/logout";
const CURRENT_USER_PATH: &str = "/auth/me";

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`BackendError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeouts: &SessionTimeouts) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| BackendError::ClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// # Errors
    ///
    /// Returns [`BackendError::ClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: &SessionConfig) -> Result<Self, BackendError> {
        Self::new(config.api_base_url.clone(), &config.timeouts)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<ApiEnvelope<T>, BackendError> {
        let response = request.send().await.map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| BackendError::Network(e.to_string()))?;
        parse_envelope(status, &text)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, BackendError> {
        let envelope: ApiEnvelope<UserProfile> = self.post_json(LOGIN_PATH, request).await?;
        let token = envelope
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::Malformed("login response missing token".into()))?;
        let profile = envelope
            .data
            .ok_or_else(|| BackendError::Malformed("login response missing profile".into()))?;
        Ok(LoginGrant { message: envelope.message, token, profile })
    }

    async fn register_talent(&self, request: &TalentRegisterRequest) -> Result<Registration, BackendError> {
        let envelope: ApiEnvelope<UserProfile> = self.post_json(REGISTER_TALENT_PATH, request).await?;
        Ok(Registration { message: envelope.message, profile: envelope.data })
    }

    async fn register_recruiter(&self, request: &RecruiterRegisterRequest) -> Result<Registration, BackendError> {
        let envelope: ApiEnvelope<UserProfile> = self.post_json(REGISTER_RECRUITER_PATH, request).await?;
        Ok(Registration { message: envelope.message, profile: envelope.data })
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), BackendError> {
        let mut request = self.http.post(self.url(LOGOUT_PATH));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: Some(status.as_u16()),
                message: default_failure_message(status.as_u16()),
            });
        }
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, BackendError> {
        let envelope: ApiEnvelope<UserProfile> =
            self.send(self.http.get(self.url(CURRENT_USER_PATH)).bearer_auth(token)).await?;
        envelope
            .data
            .ok_or_else(|| BackendError::Malformed("current user response missing profile".into()))
    }
}

// =============================================================================
// PARSING
// =============================================================================

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn default_failure_message(status: u16) -> String {
    format!("request failed with status {status}")
}

/// Interpret a backend response. A body with `success: false` or a non-2xx
/// status is a rejection; an unreadable 2xx body is malformed.
pub(crate) fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<ApiEnvelope<T>, BackendError> {
    let ok_status = (200..300).contains(&status);
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) if envelope.success && ok_status => Ok(envelope),
        Ok(envelope) => {
            let message =
                if envelope.message.is_empty() { default_failure_message(status) } else { envelope.message };
            Err(BackendError::Rejected { status: Some(status), message })
        }
        Err(_) if !ok_status => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| default_failure_message(status));
            Err(BackendError::Rejected { status: Some(status), message })
        }
        Err(e) => Err(BackendError::Malformed(e.to_string())),
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
