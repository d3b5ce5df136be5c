//! Mock persisted session store for testing.

use crate::error::{AuthError, Result};
use crate::providers::SessionCache;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock persisted session store.
///
/// A plain in-memory key/value map. It survives as long as the test holds
/// a clone, which stands in for "survives a process restart": build a new
/// manager over the same clone to simulate a fresh start.
#[derive(Debug, Clone, Default)]
pub struct MockSessionCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSessionCache {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys (for asserting the record was fully cleared).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Is the store empty?
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Synchronous read for assertions.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn get_sync(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Synchronous write for seeding records.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn put_sync(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))
    }
}

impl SessionCache for MockSessionCache {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let this = self.clone();
        let key = key.to_string();

        async move { Ok(this.lock()?.get(&key).cloned()) }
    }

    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        let key = key.to_string();
        let value = value.to_string();

        async move {
            this.lock()?.insert(key, value);
            Ok(())
        }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        let key = key.to_string();

        async move {
            this.lock()?.remove(&key);
            Ok(())
        }
    }
}
