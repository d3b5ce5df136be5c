//! Session engine constants.
//!
//! This module contains constant values used throughout the session engine.

/// Keys of the persisted staff-session record.
///
/// The persisted session store is a flat key/value surface; the staff
/// session occupies exactly these three keys.
pub mod session_keys {
    /// "Is a staff session active" flag; the value is `"true"` when set.
    pub const ACTIVE: &str = "staff_session_active";

    /// Role string of the persisted staff session (`"admin"`/`"assistant"`).
    pub const ROLE: &str = "staff_session_role";

    /// Staff account id of the persisted staff session, as a decimal string.
    pub const STAFF_ID: &str = "staff_session_id";
}

/// Default username of the account created by the first-admin bootstrap.
pub const DEFAULT_BOOTSTRAP_USERNAME: &str = "aymen";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys_are_distinct() {
        assert_ne!(session_keys::ACTIVE, session_keys::ROLE);
        assert_ne!(session_keys::ROLE, session_keys::STAFF_ID);
        assert_ne!(session_keys::ACTIVE, session_keys::STAFF_ID);
    }
}
