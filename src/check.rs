//! Auth check protocol: reconcile the session with the credential store.
//!
//! DESIGN
//! ======
//! The default policy trusts the store as a cache of the last successful
//! login and never contacts the backend. `Revalidate` asks the backend about
//! the stored token; a network failure still falls back to the cached pairing
//! so the client stays usable offline.
//!
//! ERROR HANDLING
//! ==============
//! The check never fails past its boundary. Unreadable storage or a
//! malformed snapshot both resolve to "not authenticated".

use tracing::{debug, warn};

use crate::backend::BackendError;
use crate::gateway::AuthGateway;
use crate::profile::UserProfile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckPolicy {
    /// Stored credential is authoritative.
    #[default]
    TrustLocal,
    /// Stored token is confirmed with the backend on every check.
    Revalidate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Authenticated(UserProfile),
    Unauthenticated,
}

impl CheckOutcome {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn into_user(self) -> Option<UserProfile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Unauthenticated => None,
        }
    }
}

/// Run one check pass against the gateway's store (and backend, when
/// revalidating).
pub async fn check_credentials(gateway: &AuthGateway, policy: CheckPolicy) -> CheckOutcome {
    let credential = match gateway.store().read().await {
        Ok(Some(credential)) => credential,
        Ok(None) => {
            debug!("no stored credential");
            return CheckOutcome::Unauthenticated;
        }
        Err(e) => {
            warn!(error = %e, "credential store unreadable; treating as logged out");
            return CheckOutcome::Unauthenticated;
        }
    };

    if credential.token.is_empty() {
        warn!("stored credential has an empty token; treating as logged out");
        return CheckOutcome::Unauthenticated;
    }

    match policy {
        CheckPolicy::TrustLocal => CheckOutcome::Authenticated(credential.profile),
        CheckPolicy::Revalidate => match gateway.backend().current_user(&credential.token).await {
            Ok(profile) => CheckOutcome::Authenticated(profile),
            Err(BackendError::Rejected { status, message }) => {
                warn!(?status, %message, "stored token rejected by backend");
                CheckOutcome::Unauthenticated
            }
            Err(e) => {
                warn!(error = %e, "revalidation unavailable; using cached credential");
                CheckOutcome::Authenticated(credential.profile)
            }
        },
    }
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
