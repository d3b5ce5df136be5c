//! Persisted session store trait and the staff-session record layout.

use crate::constants::session_keys;
use crate::error::Result;
use crate::state::{StaffId, StaffRole, StaffSession};
use std::future::Future;

/// Persisted session store.
///
/// A durable, process-restart-surviving key/value surface. The staff
/// session occupies the three keys in [`crate::constants::session_keys`].
///
/// The record is a convenience cache, not a security boundary: it carries
/// no integrity protection and is readable by anything with local access.
/// It only ever mirrors a staff session that was verified against the
/// remote credential store earlier in the same profile.
pub trait SessionCache: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the storage cannot be
    /// read.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the storage cannot be
    /// written.
    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the storage cannot be
    /// written.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Read the persisted staff-session record.
///
/// Returns `None` unless the record is active AND carries a role string
/// that parses to a known [`StaffRole`] AND a well-formed staff id. A
/// record that fails validation is never trusted.
///
/// # Errors
///
/// Propagates storage read failures.
pub(crate) async fn load_staff_session<S: SessionCache>(cache: &S) -> Result<Option<StaffSession>> {
    let active = cache.get(session_keys::ACTIVE).await?;
    if active.as_deref() != Some("true") {
        return Ok(None);
    }

    let role = match cache.get(session_keys::ROLE).await? {
        Some(raw) => match StaffRole::parse(&raw) {
            Some(role) => role,
            None => {
                tracing::warn!(role = %raw, "persisted staff session carries unknown role, discarding");
                return Ok(None);
            }
        },
        None => return Ok(None),
    };

    let staff_id = match cache.get(session_keys::STAFF_ID).await? {
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) => StaffId(id),
            Err(_) => {
                tracing::warn!(staff_id = %raw, "persisted staff session carries malformed id, discarding");
                return Ok(None);
            }
        },
        None => return Ok(None),
    };

    Ok(Some(StaffSession { staff_id, role }))
}

/// Write the persisted staff-session record for a fresh staff login.
///
/// # Errors
///
/// Propagates storage write failures.
pub(crate) async fn store_staff_session<S: SessionCache>(
    cache: &S,
    session: StaffSession,
) -> Result<()> {
    cache.put(session_keys::ACTIVE, "true").await?;
    cache.put(session_keys::ROLE, session.role.as_str()).await?;
    cache
        .put(session_keys::STAFF_ID, &session.staff_id.to_string())
        .await
}

/// Clear the persisted staff-session record entirely.
///
/// # Errors
///
/// Propagates storage write failures.
pub(crate) async fn clear_staff_session<S: SessionCache>(cache: &S) -> Result<()> {
    cache.remove(session_keys::ACTIVE).await?;
    cache.remove(session_keys::ROLE).await?;
    cache.remove(session_keys::STAFF_ID).await
}
