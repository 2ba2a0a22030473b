//! Auth gateway: login, registration and logout round trips.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway is the only writer of the credential store. Call sites never
//! see raw errors: every flow ends in an [`AuthResponse`] envelope and
//! callers branch on `success` alone.
//!
//! TRADE-OFFS
//! ==========
//! Registration deliberately does not log the user in. A caller that wants a
//! session after sign-up must run the login flow explicitly.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::backend::{Backend, BackendError};
use crate::profile::{Role, UserProfile};
use crate::store::{Credential, CredentialStore, StoreError};
use crate::validate::{LoginForm, RecruiterSignupForm, TalentSignupForm, ValidationError};

// =============================================================================
// ENVELOPE
// =============================================================================

/// Uniform result of a gateway flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> AuthResponse<T> {
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, message: message.into(), data }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None }
    }
}

impl<T> From<GatewayError> for AuthResponse<T> {
    fn from(err: GatewayError) -> Self {
        Self::failure(err.to_string())
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Input rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unable to reach the server: {0}")]
    Network(String),
    /// The backend's own message, surfaced verbatim.
    #[error("{0}")]
    BackendRejected(String),
    #[error("Could not save your session: {0}")]
    Storage(#[from] StoreError),
    #[error("Something went wrong: {0}")]
    Unknown(String),
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Network(e) => Self::Network(e),
            BackendError::Rejected { message, .. } => Self::BackendRejected(message),
            other @ (BackendError::Malformed(_) | BackendError::ClientBuild(_)) => Self::Unknown(other.to_string()),
        }
    }
}

impl GatewayError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::BackendRejected(_) => "backend_rejected",
            Self::Storage(_) => "storage",
            Self::Unknown(_) => "unknown",
        }
    }
}

fn normalize<T>(flow: &'static str, result: Result<AuthResponse<T>, GatewayError>) -> AuthResponse<T> {
    result.unwrap_or_else(|e| {
        warn!(flow, kind = e.kind(), error = %e, "auth flow failed");
        e.into()
    })
}

// =============================================================================
// GATEWAY
// =============================================================================

#[derive(Clone)]
pub struct AuthGateway {
    backend: Arc<dyn Backend>,
    store: Arc<dyn CredentialStore>,
}

impl AuthGateway {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn CredentialStore>) -> Self {
        Self { backend, store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Validate, authenticate, then persist token and profile as one write.
    /// On any failure the store is left exactly as it was.
    pub async fn login(&self, form: &LoginForm) -> AuthResponse<UserProfile> {
        normalize("login", self.try_login(form).await)
    }

    async fn try_login(&self, form: &LoginForm) -> Result<AuthResponse<UserProfile>, GatewayError> {
        let request = form.validate()?;
        let grant = self.backend.login(&request).await?;
        self.store.write(&Credential::new(grant.token, grant.profile.clone())).await?;
        info!(role = grant.profile.role().map_or("none", Role::as_str), "login succeeded");
        Ok(AuthResponse::ok(grant.message, Some(grant.profile)))
    }

    /// Create a talent account. Never touches the credential store.
    pub async fn register_talent(&self, form: &TalentSignupForm) -> AuthResponse<UserProfile> {
        normalize("register_talent", self.try_register_talent(form).await)
    }

    async fn try_register_talent(&self, form: &TalentSignupForm) -> Result<AuthResponse<UserProfile>, GatewayError> {
        let request = form.validate()?;
        let registration = self.backend.register_talent(&request).await?;
        info!(kind = "talent", "registration succeeded");
        Ok(AuthResponse::ok(registration.message, registration.profile))
    }

    /// Create a recruiter account. Never touches the credential store.
    pub async fn register_recruiter(&self, form: &RecruiterSignupForm) -> AuthResponse<UserProfile> {
        normalize("register_recruiter", self.try_register_recruiter(form).await)
    }

    async fn try_register_recruiter(
        &self,
        form: &RecruiterSignupForm,
    ) -> Result<AuthResponse<UserProfile>, GatewayError> {
        let request = form.validate()?;
        let registration = self.backend.register_recruiter(&request).await?;
        info!(kind = "recruiter", "registration succeeded");
        Ok(AuthResponse::ok(registration.message, registration.profile))
    }

    /// Clear the credential store, then tell the backend on a best-effort
    /// basis. The store is cleared whether or not the backend is reachable.
    pub async fn logout(&self) -> AuthResponse<()> {
        let token = match self.store.read().await {
            Ok(credential) => credential.map(|c| c.token),
            Err(e) => {
                warn!(error = %e, "could not read credential before logout");
                None
            }
        };

        let cleared = self.store.clear().await;

        if let Err(e) = self.backend.logout(token.as_deref()).await {
            warn!(error = %e, "backend logout failed; local credential cleared regardless");
        }

        match cleared {
            Ok(()) => {
                info!("logout completed");
                AuthResponse::ok("Logged out", None)
            }
            Err(e) => normalize("logout", Err(e.into())),
        }
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
