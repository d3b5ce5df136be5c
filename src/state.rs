//! Session state types.
//!
//! This module defines the core state types for the session engine.
//! All types are `Clone` so snapshots can be handed out freely.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a staff account.
///
/// Staff accounts live in the remote credential store under an integer
/// primary key; this newtype keeps them from being confused with the
/// federated provider's customer ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(pub i64);

impl std::fmt::Display for StaffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Roles
// ═══════════════════════════════════════════════════════════════════════

/// Staff role.
///
/// Exactly two roles exist; no other value is ever persisted or trusted.
/// A persisted session record carrying any other role string is discarded
/// during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    /// Full privileges, including the metrics and history views.
    Admin,
    /// Day-to-day operations (reservations) only.
    Assistant,
}

impl StaffRole {
    /// Get the role name as persisted in the credential store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a role from its persisted string form.
    ///
    /// Returns `None` for anything that is not exactly one of the two
    /// known roles; callers must treat that as an untrusted record.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Identity Tracks
// ═══════════════════════════════════════════════════════════════════════

/// Opaque customer identity record from the federated provider.
///
/// The provider is the source of truth for everything about a customer;
/// this crate only carries the handle it needs for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    /// Provider-assigned user id.
    pub id: uuid::Uuid,

    /// Email address the customer signed in with.
    pub email: String,
}

/// An authenticated staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSession {
    /// Staff account id in the credential store.
    pub staff_id: StaffId,

    /// Role the account carries.
    pub role: StaffRole,
}

// ═══════════════════════════════════════════════════════════════════════
// Unified Session State
// ═══════════════════════════════════════════════════════════════════════

/// Who the current actor is, for authorization purposes.
///
/// This is a tagged union rather than a pair of independent flags: the
/// guard can never observe "customer and staff at once". When both
/// identity tracks are populated internally, staff takes precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    /// No identity on either track.
    #[default]
    Anonymous,

    /// A customer signed in through the federated provider.
    Customer(CustomerIdentity),

    /// A staff member verified against the local credential store.
    Staff(StaffSession),
}

impl SessionState {
    /// Returns `true` if a staff member is authenticated.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Staff(_))
    }

    /// Returns `true` if a customer is authenticated (staff excluded).
    #[must_use]
    pub const fn is_customer(&self) -> bool {
        matches!(self, Self::Customer(_))
    }

    /// Staff role, if a staff member is authenticated.
    #[must_use]
    pub const fn staff_role(&self) -> Option<StaffRole> {
        match self {
            Self::Staff(session) => Some(session.role),
            _ => None,
        }
    }
}

/// Read-only view of the session at a point in time.
///
/// Produced by [`crate::SessionManager::snapshot`]; consumed by the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Authorization-facing state (staff precedence already applied).
    pub state: SessionState,

    /// True until the first resolution of both identity sources completes.
    ///
    /// While this is set, no authorization decision may be made against
    /// the snapshot; the guard awaits initialization instead.
    pub initializing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(StaffRole::parse("admin"), Some(StaffRole::Admin));
        assert_eq!(StaffRole::parse("assistant"), Some(StaffRole::Assistant));
        assert_eq!(StaffRole::parse(StaffRole::Admin.as_str()), Some(StaffRole::Admin));
    }

    #[test]
    fn test_unknown_roles_are_rejected() {
        assert_eq!(StaffRole::parse("superadmin"), None);
        assert_eq!(StaffRole::parse("Admin"), None);
        assert_eq!(StaffRole::parse(""), None);
    }

    #[test]
    fn test_session_state_derived_facts() {
        let staff = SessionState::Staff(StaffSession {
            staff_id: StaffId(1),
            role: StaffRole::Assistant,
        });
        assert!(staff.is_staff());
        assert!(!staff.is_customer());
        assert_eq!(staff.staff_role(), Some(StaffRole::Assistant));

        assert_eq!(SessionState::Anonymous.staff_role(), None);
        assert!(!SessionState::Anonymous.is_customer());
    }
}
