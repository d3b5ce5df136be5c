//! Error types for session and authorization operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the session and authorization engine.
///
/// The taxonomy is deliberately small: every failure a caller can act on
/// has its own variant, and everything else is `Unavailable` or `Internal`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Credential Errors
    // ═══════════════════════════════════════════════════════════

    /// Wrong username/password or digest mismatch.
    ///
    /// Deliberately generic: an unknown username and a wrong password for
    /// an existing username both map here, so the error never reveals
    /// which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Operation requires an active staff session.
    #[error("Not authenticated as staff")]
    NotAuthenticated,

    /// Bootstrap attempted when a staff account already exists.
    #[error("A staff account already exists")]
    Conflict,

    /// Malformed registration input, surfaced from the identity provider.
    #[error("Validation failed: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════
    // Store Errors
    // ═══════════════════════════════════════════════════════════

    /// Referenced staff account does not exist.
    ///
    /// Only produced by store mutations (`update_password_hash`); lookup
    /// misses during login are folded into `InvalidCredentials` instead.
    #[error("Staff account not found")]
    AccountNotFound,

    /// Remote store or identity provider unreachable.
    ///
    /// Fatal to the in-flight operation; not retried by this crate.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Internal error (lock poisoning, malformed stored hash).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fleetrent_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_user_error());
    /// assert!(!AuthError::Unavailable("db".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::NotAuthenticated | Self::Conflict | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(AuthError::InvalidCredentials.is_user_error());
        assert!(AuthError::Conflict.is_user_error());
        assert!(AuthError::Validation("bad email".to_string()).is_user_error());
        assert!(!AuthError::AccountNotFound.is_user_error());
        assert!(!AuthError::Internal("lock".to_string()).is_user_error());
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        // The display string must not mention usernames or passwords
        // so unknown-user and wrong-password are indistinguishable.
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
