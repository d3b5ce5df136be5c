//! Mock federated identity provider for testing.

use crate::error::{AuthError, Result};
use crate::providers::IdentityProvider;
use crate::state::CustomerIdentity;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Mock federated identity provider.
///
/// In-memory customer accounts keyed by email. The provider-side session
/// is a `watch` channel, so tests can both observe subscriptions and
/// simulate external session changes (expiry, sign-in from another tab)
/// with [`emit_change`](Self::emit_change).
#[derive(Debug, Clone)]
pub struct MockIdentityProvider {
    accounts: Arc<Mutex<HashMap<String, (String, CustomerIdentity)>>>,
    current: Arc<watch::Sender<Option<CustomerIdentity>>>,
    unavailable: Arc<AtomicBool>,
    latency: Arc<Mutex<Option<Duration>>>,
    current_user_calls: Arc<AtomicUsize>,
}

impl MockIdentityProvider {
    /// Create a provider with no accounts and no active session.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            current: Arc::new(current),
            unavailable: Arc::new(AtomicBool::new(false)),
            latency: Arc::new(Mutex::new(None)),
            current_user_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register a customer account the provider will accept.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn add_customer(&self, email: &str, password: &str) -> Result<CustomerIdentity> {
        let identity = CustomerIdentity {
            id: uuid::Uuid::new_v4(),
            email: email.to_string(),
        };
        let mut accounts = lock_poisoned(&self.accounts)?;
        accounts.insert(email.to_string(), (password.to_string(), identity.clone()));
        Ok(identity)
    }

    /// Simulate a provider-side session change (external expiry, another
    /// tab signing in or out).
    pub fn emit_change(&self, identity: Option<CustomerIdentity>) {
        let _ = self.current.send_replace(identity);
    }

    /// Toggle failure injection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every `current_user` fetch, for exercising the
    /// initialization timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn set_latency(&self, latency: Option<Duration>) -> Result<()> {
        *lock_poisoned(&self.latency)? = latency;
        Ok(())
    }

    /// How many times `current_user` has been fetched (for asserting the
    /// single-flight initialization property).
    #[must_use]
    pub fn current_user_calls(&self) -> usize {
        self.current_user_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("identity provider".to_string()));
        }
        Ok(())
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned<T>(mutex: &Arc<Mutex<T>>) -> Result<std::sync::MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))
}

impl IdentityProvider for MockIdentityProvider {
    fn current_user(&self) -> impl Future<Output = Result<Option<CustomerIdentity>>> + Send {
        let this = self.clone();

        async move {
            this.current_user_calls.fetch_add(1, Ordering::SeqCst);
            let latency = *lock_poisoned(&this.latency)?;
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            this.check_available()?;
            Ok(this.current.borrow().clone())
        }
    }

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<CustomerIdentity>> + Send {
        let this = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            this.check_available()?;
            let identity = {
                let accounts = lock_poisoned(&this.accounts)?;
                match accounts.get(&email) {
                    Some((stored, identity)) if *stored == password => identity.clone(),
                    _ => return Err(AuthError::InvalidCredentials),
                }
            };
            let _ = this.current.send_replace(Some(identity.clone()));
            Ok(identity)
        }
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<CustomerIdentity>> + Send {
        let this = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            this.check_available()?;
            if !email.contains('@') {
                return Err(AuthError::Validation("invalid email address".to_string()));
            }
            if password.len() < 8 {
                return Err(AuthError::Validation(
                    "password must be at least 8 characters".to_string(),
                ));
            }

            let identity = {
                let mut accounts = lock_poisoned(&this.accounts)?;
                if accounts.contains_key(&email) {
                    return Err(AuthError::Validation("email already registered".to_string()));
                }
                let identity = CustomerIdentity {
                    id: uuid::Uuid::new_v4(),
                    email: email.clone(),
                };
                accounts.insert(email, (password, identity.clone()));
                identity
            };
            let _ = this.current.send_replace(Some(identity.clone()));
            Ok(identity)
        }
    }

    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send {
        let this = self.clone();

        async move {
            this.check_available()?;
            let _ = this.current.send_replace(None);
            Ok(())
        }
    }

    fn subscribe(&self) -> watch::Receiver<Option<CustomerIdentity>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn test_sign_in_round_trip() {
        let provider = MockIdentityProvider::new();
        let registered = provider.add_customer("rider@example.com", "pedal-power").unwrap();

        let signed_in = provider.sign_in("rider@example.com", "pedal-power").await.unwrap();
        assert_eq!(signed_in, registered);
        assert_eq!(provider.current_user().await.unwrap(), Some(registered));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let provider = MockIdentityProvider::new();
        provider.add_customer("rider@example.com", "pedal-power").unwrap();

        let result = provider.sign_in("rider@example.com", "wrong").await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let provider = MockIdentityProvider::new();
        assert!(matches!(
            provider.sign_up("not-an-email", "long-enough").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            provider.sign_up("rider@example.com", "short").await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_subscription_observes_changes() {
        let provider = MockIdentityProvider::new();
        let mut rx = provider.subscribe();

        let identity = provider.add_customer("rider@example.com", "pedal-power").unwrap();
        provider.emit_change(Some(identity.clone()));

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(identity));
    }
}
