//! Federated identity provider trait.

use crate::error::Result;
use crate::state::CustomerIdentity;
use std::future::Future;
use tokio::sync::watch;

/// Federated identity provider.
///
/// Thin pass-through over the external customer identity service. The
/// provider owns the customer session end to end; this crate never stores
/// or compares customer credentials itself.
pub trait IdentityProvider: Send + Sync {
    /// Fetch the customer currently signed in with the provider, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the provider is
    /// unreachable.
    fn current_user(&self) -> impl Future<Output = Result<Option<CustomerIdentity>>> + Send;

    /// Sign a customer in.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider rejects the credentials →
    ///   [`crate::AuthError::InvalidCredentials`], surfaced verbatim
    /// - The provider is unreachable → [`crate::AuthError::Unavailable`]
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<CustomerIdentity>> + Send;

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider rejects the input → [`crate::AuthError::Validation`]
    /// - The provider is unreachable → [`crate::AuthError::Unavailable`]
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<CustomerIdentity>> + Send;

    /// End the provider-side customer session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the provider is
    /// unreachable.
    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send;

    /// Subscribe to provider-side session changes.
    ///
    /// The channel carries the current customer identity (or `None`) and
    /// fires whenever the provider's session changes for any reason,
    /// including external expiry. The session manager re-syncs its
    /// customer track on every notification, independent of any local
    /// operation.
    fn subscribe(&self) -> watch::Receiver<Option<CustomerIdentity>>;
}
