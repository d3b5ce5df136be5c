//! Credential store trait.

use super::{NewStaffAccount, StaffAccount};
use crate::error::Result;
use crate::state::StaffId;
use chrono::{DateTime, Utc};
use std::future::Future;

/// Credential store.
///
/// Abstracts over the remote relational table of staff accounts
/// (`username`, `password_hash`, `role`, `updated_at`). The store performs
/// remote mutation only; nothing is cached locally, and store errors
/// surface to the caller rather than being swallowed.
pub trait CredentialStore: Send + Sync {
    /// Look up an account by its unique username.
    ///
    /// Returns `Ok(None)` on a miss; the caller decides how to surface
    /// that (login folds it into `InvalidCredentials`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the store is unreachable.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<StaffAccount>>> + Send;

    /// Look up an account by id.
    ///
    /// Used by password rotation to re-fetch the stored digest for the
    /// active staff session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the store is unreachable.
    fn find_by_id(
        &self,
        id: StaffId,
    ) -> impl Future<Output = Result<Option<StaffAccount>>> + Send;

    /// Create the very first staff account.
    ///
    /// Bootstrap is single-use: the store itself must reject the insert
    /// with [`crate::AuthError::Conflict`] when any account already
    /// exists; callers never assume the check.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Any staff account already exists → [`crate::AuthError::Conflict`]
    /// - The store is unreachable → [`crate::AuthError::Unavailable`]
    fn insert_first_account(
        &self,
        account: NewStaffAccount,
    ) -> impl Future<Output = Result<StaffId>> + Send;

    /// Replace an account's credential digest.
    ///
    /// Also stamps `updated_at` with the supplied timestamp.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The account does not exist → [`crate::AuthError::AccountNotFound`]
    /// - The store is unreachable → [`crate::AuthError::Unavailable`]
    fn update_password_hash(
        &self,
        id: StaffId,
        new_hash: &str,
        timestamp: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Does at least one staff account exist?
    ///
    /// Backs the first-run setup check.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the store is unreachable.
    fn has_accounts(&self) -> impl Future<Output = Result<bool>> + Send;
}
