//! In-memory token store

use std::sync::Mutex;
use std::sync::PoisonError;

use async_trait::async_trait;

use super::ServerDetails;
use super::TokenStore;
use crate::error::StoreError;

/// A token store that keeps the details in memory.
///
/// Nothing survives the process; useful for tests and for callers that only
/// want the tokens handed back.
///
/// # Example
///
/// ```
/// use iamctl_lib::store::MemoryTokenStore;
///
/// let store = MemoryTokenStore::new();
/// assert_eq!(store.save_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    details: Mutex<Option<ServerDetails>>,
    saves: Mutex<usize>,
}

impl MemoryTokenStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the stored details.
    pub fn get(&self) -> Option<ServerDetails> {
        self.details
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, details: &ServerDetails) -> Result<(), StoreError> {
        *self.details.lock().unwrap_or_else(PoisonError::into_inner) = Some(details.clone());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    async fn load(&self) -> Result<Option<ServerDetails>, StoreError> {
        Ok(self.get())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.details.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
