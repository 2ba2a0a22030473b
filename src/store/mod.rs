//! Credential store boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store persists the bearer token and the profile snapshot outside the
//! client process. Only the auth gateway writes it and only the auth check
//! reads it; concurrent writers are resolved by last-writer-wins.
//!
//! DESIGN
//! ======
//! Token and profile are written as one [`Credential`] value so a store can
//! never hold a token without its profile (or the reverse).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// Opaque bearer token paired with the profile it was issued for.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub profile: UserProfile,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>, profile: UserProfile) -> Self {
        Self { token: token.into(), profile }
    }
}

// Keep tokens out of logs and panic messages.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("profile", &self.profile)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
    #[error("credential store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored credential is malformed: {0}")]
    Malformed(String),
}

/// Durable, process-external key-value storage for the session credential.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the medium cannot be read or the stored
    /// value cannot be decoded.
    async fn read(&self) -> Result<Option<Credential>, StoreError>;

    /// Replace the stored credential as a single unit.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the medium cannot be written. On error the
    /// previous credential must still be intact.
    async fn write(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Remove the stored credential. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the medium cannot be modified.
    async fn clear(&self) -> Result<(), StoreError>;
}
