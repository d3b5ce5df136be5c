//! # FleetRent Session & Authorization Engine
//!
//! The access-control core of the FleetRent vehicle-rental platform: for
//! every incoming actor it decides *who they are* (anonymous visitor,
//! registered customer, or staff member with a role) and *what they may
//! reach*, and it keeps that decision consistent across navigations and
//! across two independent credential sources.
//!
//! ## The two identity tracks
//!
//! - **Customers** authenticate against an external federated identity
//!   provider, consumed behind the [`providers::IdentityProvider`] trait.
//! - **Staff** authenticate against a locally managed credential table
//!   ([`providers::CredentialStore`]) with salted Argon2id digests,
//!   including a one-time "first admin" bootstrap and password rotation.
//!
//! The tracks never share storage or comparison logic; when both are
//! populated, staff takes precedence for authorization.
//!
//! ## Architecture
//!
//! ```text
//! navigation ──▶ RouteGuard ──▶ SessionManager ──▶ CredentialStore
//!                   │                 │       └──▶ IdentityProvider
//!                   ▼                 └──────────▶ SessionCache
//!             Allow / Redirect
//! ```
//!
//! The [`SessionManager`] is explicitly constructed over the three
//! provider traits and shared (behind an [`std::sync::Arc`]) with the
//! [`RouteGuard`]; a navigation attempt suspends until initialization has
//! resolved, then the guard applies the pure [`guard::decide`] policy.
//!
//! ## Example: staff login
//!
//! ```rust,ignore
//! use fleetrent_auth::*;
//! use std::sync::Arc;
//!
//! let manager = Arc::new(SessionManager::new(
//!     credentials, identity, cache, AuthConfig::default(),
//! )?);
//! let guard = RouteGuard::new(Arc::clone(&manager));
//!
//! manager.initialize().await;
//! let landing = manager.login_staff("aymen", "secret123").await?;
//! assert_eq!(guard.authorize(&RouteRequirement::super_admin()).await?, Access::Allow);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod error;
pub mod guard;
pub mod manager;
pub mod navigation;
pub mod password;
pub mod providers;
pub mod state;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use guard::{Access, RouteGuard, RouteRequirement, decide};
pub use manager::SessionManager;
pub use navigation::NavigationTarget;
pub use password::CredentialHasher;
pub use state::{
    CustomerIdentity, SessionSnapshot, SessionState, StaffId, StaffRole, StaffSession,
};
