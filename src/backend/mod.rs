//! Backend REST boundary consumed by the auth gateway.
//!
//! SYSTEM CONTEXT
//! ==============
//! The job-matching backend owns accounts and tokens. Every endpoint answers
//! with the same `{success, message, token?, data?}` envelope; the gateway
//! only sees the typed results below.

pub mod http;

pub use http::HttpBackend;

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentRegisterRequest {
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterRegisterRequest {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"<redacted>")
                    .finish()
            }
        }
    };
}

redacted_debug!(LoginRequest { email });
redacted_debug!(TalentRegisterRequest { fname, lname, email, phone_number, date_of_birth });
redacted_debug!(RecruiterRegisterRequest { company_name, contact_name, email, phone_number });

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Wire envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub token: Option<String>,
    pub data: Option<T>,
}

/// Successful login: the token and the profile it was issued for.
#[derive(Clone, PartialEq)]
pub struct LoginGrant {
    pub message: String,
    pub token: String,
    pub profile: UserProfile,
}

impl std::fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginGrant")
            .field("message", &self.message)
            .field("token", &"<redacted>")
            .field("profile", &self.profile)
            .finish()
    }
}

/// Successful registration. The backend may or may not echo the new profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub message: String,
    pub profile: Option<UserProfile>,
}

// =============================================================================
// ERRORS + TRAIT
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),
    /// A well-formed response saying no.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },
    /// A response that could not be understood.
    #[error("malformed backend response: {0}")]
    Malformed(String),
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Backend endpoints used by the session core. Implemented over HTTP by
/// [`HttpBackend`]; mocked in tests.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] for bad credentials.
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, BackendError>;

    /// `POST /auth/register/talent`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the backend refuses the account.
    async fn register_talent(&self, request: &TalentRegisterRequest) -> Result<Registration, BackendError>;

    /// `POST /auth/register/recruiter`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the backend refuses the account.
    async fn register_recruiter(&self, request: &RecruiterRegisterRequest) -> Result<Registration, BackendError>;

    /// `POST /auth/logout`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the request could not be delivered.
    async fn logout(&self, token: Option<&str>) -> Result<(), BackendError>;

    /// `GET /auth/me`, used only when stored tokens are revalidated.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the token is no longer valid.
    async fn current_user(&self, token: &str) -> Result<UserProfile, BackendError>;
}
