//! Mock credential store for testing.

use crate::error::{AuthError, Result};
use crate::providers::{CredentialStore, NewStaffAccount, StaffAccount};
use crate::state::{StaffId, StaffRole};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Mock credential store.
///
/// Uses in-memory storage for testing. `set_unavailable(true)` makes every
/// operation fail with [`AuthError::Unavailable`], for exercising the
/// failure-leaves-state-unchanged properties.
#[derive(Debug, Clone)]
pub struct MockCredentialStore {
    accounts: Arc<Mutex<BTreeMap<i64, StaffAccount>>>,
    next_id: Arc<AtomicI64>,
    unavailable: Arc<AtomicBool>,
}

impl MockCredentialStore {
    /// Create an empty mock credential store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Toggle failure injection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Seed an account directly, bypassing the single-use bootstrap rule
    /// (stands in for the out-of-band administrative process).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn seed_account(
        &self,
        username: &str,
        password_hash: &str,
        role: StaffRole,
    ) -> Result<StaffId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut accounts = lock_accounts(&self.accounts)?;
        accounts.insert(
            id,
            StaffAccount {
                id: StaffId(id),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                role,
                updated_at: Utc::now(),
            },
        );
        Ok(StaffId(id))
    }

    /// Stored digest of an account (for asserting it was or wasn't touched).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn stored_hash(&self, id: StaffId) -> Result<Option<String>> {
        let accounts = lock_accounts(&self.accounts)?;
        Ok(accounts.get(&id.0).map(|a| a.password_hash.clone()))
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("credential store".to_string()));
        }
        Ok(())
    }
}

impl Default for MockCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_accounts(
    accounts: &Arc<Mutex<BTreeMap<i64, StaffAccount>>>,
) -> Result<std::sync::MutexGuard<'_, BTreeMap<i64, StaffAccount>>> {
    accounts
        .lock()
        .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))
}

impl CredentialStore for MockCredentialStore {
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<StaffAccount>>> + Send {
        let this = self.clone();
        let username = username.to_string();

        async move {
            this.check_available()?;
            let accounts = lock_accounts(&this.accounts)?;
            Ok(accounts.values().find(|a| a.username == username).cloned())
        }
    }

    fn find_by_id(&self, id: StaffId) -> impl Future<Output = Result<Option<StaffAccount>>> + Send {
        let this = self.clone();

        async move {
            this.check_available()?;
            let accounts = lock_accounts(&this.accounts)?;
            Ok(accounts.get(&id.0).cloned())
        }
    }

    fn insert_first_account(
        &self,
        account: NewStaffAccount,
    ) -> impl Future<Output = Result<StaffId>> + Send {
        let this = self.clone();

        async move {
            this.check_available()?;
            let mut accounts = lock_accounts(&this.accounts)?;
            if !accounts.is_empty() {
                return Err(AuthError::Conflict);
            }

            let id = this.next_id.fetch_add(1, Ordering::SeqCst);
            accounts.insert(
                id,
                StaffAccount {
                    id: StaffId(id),
                    username: account.username,
                    password_hash: account.password_hash,
                    role: account.role,
                    updated_at: Utc::now(),
                },
            );
            Ok(StaffId(id))
        }
    }

    fn update_password_hash(
        &self,
        id: StaffId,
        new_hash: &str,
        timestamp: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();
        let new_hash = new_hash.to_string();

        async move {
            this.check_available()?;
            let mut accounts = lock_accounts(&this.accounts)?;
            let account = accounts.get_mut(&id.0).ok_or(AuthError::AccountNotFound)?;
            account.password_hash = new_hash;
            account.updated_at = timestamp;
            Ok(())
        }
    }

    fn has_accounts(&self) -> impl Future<Output = Result<bool>> + Send {
        let this = self.clone();

        async move {
            this.check_available()?;
            let accounts = lock_accounts(&this.accounts)?;
            Ok(!accounts.is_empty())
        }
    }
}
