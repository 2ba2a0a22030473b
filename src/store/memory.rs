//! In-process credential store.

use std::sync::Mutex;

use super::{Credential, CredentialStore, StoreError};

/// Credential store held in memory. Useful for embedding and tests; it does
/// not survive a process restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self { slot: Mutex::new(Some(credential)) }
    }

    /// Current contents without going through the async trait.
    #[must_use]
    pub fn snapshot(&self) -> Option<Credential> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or_default()
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<Credential>) -> T) -> Result<T, StoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        Ok(f(&mut slot))
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryStore {
    async fn read(&self) -> Result<Option<Credential>, StoreError> {
        self.with_slot(|slot| slot.clone())
    }

    async fn write(&self, credential: &Credential) -> Result<(), StoreError> {
        self.with_slot(|slot| *slot = Some(credential.clone()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.with_slot(|slot| *slot = None)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
