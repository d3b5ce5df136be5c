//! Route authorization guard.
//!
//! Gates navigation by role. The policy itself is the pure [`decide`]
//! function; [`RouteGuard`] wraps it with the two stateful concerns:
//! awaiting session initialization so no decision is made against
//! partially-resolved identity, and routing first-run staff navigation to
//! the setup flow.

use crate::error::Result;
use crate::manager::SessionManager;
use crate::navigation::NavigationTarget;
use crate::providers::{CredentialStore, IdentityProvider, SessionCache};
use crate::state::{SessionState, StaffRole};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authorization requirements declared on a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteRequirement {
    /// Any authenticated actor (customer or staff) may enter.
    pub requires_auth: bool,

    /// Any staff member may enter.
    pub requires_admin: bool,

    /// Only the `Admin` role may enter (as opposed to `Assistant`).
    ///
    /// Implies `requires_admin`: a super-admin boundary can never be
    /// reached anonymously even if the flag is set on its own.
    pub requires_super_admin: bool,
}

impl RouteRequirement {
    /// A publicly reachable target.
    #[must_use]
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            requires_admin: false,
            requires_super_admin: false,
        }
    }

    /// A target for any authenticated actor.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self {
            requires_auth: true,
            requires_admin: false,
            requires_super_admin: false,
        }
    }

    /// A target for any staff member.
    #[must_use]
    pub const fn staff() -> Self {
        Self {
            requires_auth: true,
            requires_admin: true,
            requires_super_admin: false,
        }
    }

    /// A target for the `Admin` role only.
    #[must_use]
    pub const fn super_admin() -> Self {
        Self {
            requires_auth: true,
            requires_admin: true,
            requires_super_admin: true,
        }
    }
}

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    /// Proceed to the requested target.
    Allow,

    /// Navigate to the named target instead.
    Redirect(NavigationTarget),
}

/// Decide whether a session may enter a navigation target.
///
/// Rule order is load-bearing:
///
/// 1. staff required and no staff session → redirect to staff login;
/// 2. `Admin` role required but the staff member is an `Assistant` →
///    demote to the reservations index (the actor stays authenticated,
///    no logout);
/// 3. authentication required and neither identity present → redirect to
///    customer login;
/// 4. otherwise allow.
///
/// A staff session satisfies `requires_auth` even without any customer
/// identity.
#[must_use]
pub fn decide(requirement: &RouteRequirement, state: &SessionState) -> Access {
    let needs_staff = requirement.requires_admin || requirement.requires_super_admin;

    if needs_staff && !state.is_staff() {
        return Access::Redirect(NavigationTarget::StaffLogin);
    }

    if requirement.requires_super_admin && state.staff_role() != Some(StaffRole::Admin) {
        return Access::Redirect(NavigationTarget::ReservationsIndex);
    }

    if requirement.requires_auth && *state == SessionState::Anonymous {
        return Access::Redirect(NavigationTarget::CustomerLogin);
    }

    Access::Allow
}

/// Navigation guard bound to a session manager.
pub struct RouteGuard<C, I, S> {
    manager: Arc<SessionManager<C, I, S>>,
}

impl<C, I, S> RouteGuard<C, I, S>
where
    C: CredentialStore + 'static,
    I: IdentityProvider + 'static,
    S: SessionCache + 'static,
{
    /// Create a guard over a shared session manager.
    #[must_use]
    pub const fn new(manager: Arc<SessionManager<C, I, S>>) -> Self {
        Self { manager }
    }

    /// Authorize a navigation attempt.
    ///
    /// Suspends until session initialization has resolved, then applies
    /// [`decide`]. A staff-login redirect becomes a setup redirect while
    /// no staff account exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Unavailable`] if the first-run setup
    /// check cannot reach the credential store.
    pub async fn authorize(&self, requirement: &RouteRequirement) -> Result<Access> {
        self.manager.initialize().await;

        let snapshot = self.manager.snapshot().await;
        let access = decide(requirement, &snapshot.state);

        if access == Access::Redirect(NavigationTarget::StaffLogin)
            && !self.manager.check_setup_complete().await?
        {
            return Ok(Access::Redirect(NavigationTarget::StaffSetup));
        }
        Ok(access)
    }
}
