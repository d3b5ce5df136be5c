//! Credential hashing and verification using Argon2id.
//!
//! Each staff password is hashed with a per-account random salt into a
//! PHC-format string (`$argon2id$...`) suitable for storage in the
//! credential store's `password_hash` column. Verification is timing-safe,
//! and a dummy-verification path keeps unknown-username lookups from being
//! distinguishable from wrong-password attempts by timing.

use crate::error::{AuthError, Result};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};

/// Argon2id credential hasher.
///
/// Uses OWASP recommended parameters: 19 MiB memory, 2 iterations,
/// 1 lane. A single instance is cheap to clone and share.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    /// Hash of a throwaway password, verified against when an account
    /// does not exist so the lookup miss costs a real verification.
    dummy_hash: String,
}

impl CredentialHasher {
    /// Create a hasher with the recommended parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the Argon2 parameters are
    /// rejected or the dummy digest cannot be produced.
    pub fn new() -> Result<Self> {
        let params = Params::new(19_456, 2, 1, None)
            .map_err(|e| AuthError::Internal(format!("invalid Argon2 parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let dummy_hash = hash_with(&argon2, "fleetrent-dummy-credential")?;
        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Returns a PHC string carrying the algorithm, parameters, salt and
    /// digest; identical plaintexts yield different strings.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if salt generation or hashing fails.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        hash_with(&self.argon2, plaintext)
    }

    /// Verify a plaintext password against a stored PHC string.
    ///
    /// Returns `Ok(false)` on digest mismatch; the caller decides how to
    /// surface that (the session manager folds it into
    /// [`AuthError::InvalidCredentials`]).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the stored hash is not a valid
    /// PHC string. A corrupt stored hash is a system fault, not a wrong
    /// password.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(error = %e, "stored credential hash is malformed");
            AuthError::Internal("malformed stored credential hash".to_string())
        })?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Internal(format!("credential verification failed: {e}"))),
        }
    }

    /// Burn a verification against the dummy digest.
    ///
    /// Called when a username lookup misses, so the miss takes roughly the
    /// same time as a wrong password for an existing account.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}

fn hash_with(argon2: &Argon2<'static>, plaintext: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| AuthError::Internal(format!("salt generation failed: {e}")))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::Internal(format!("salt encoding failed: {e}")))?;

    let digest = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(format!("credential hashing failed: {e}")))?;
    Ok(digest.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::new().unwrap();
        let hash = hasher.hash("secret123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret123", &hash).unwrap());
        assert!(!hasher.verify("secret124", &hash).unwrap());
    }

    #[test]
    fn test_salts_are_unique_per_hash() {
        let hasher = CredentialHasher::new().unwrap();
        let first = hasher.hash("same-plaintext").unwrap();
        let second = hasher.hash("same-plaintext").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-plaintext", &first).unwrap());
        assert!(hasher.verify("same-plaintext", &second).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_internal_error() {
        let hasher = CredentialHasher::new().unwrap();
        let result = hasher.verify("whatever", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
