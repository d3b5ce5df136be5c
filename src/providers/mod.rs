//! External collaborators of the session engine.
//!
//! This module defines traits for the three dependencies the session
//! manager orchestrates. These traits enable dependency injection and make
//! the session logic testable.
//!
//! Providers are **interfaces**, not implementations. The manager depends
//! on these traits, and the application provides concrete implementations:
//!
//! - **Testing**: in-memory mocks (see [`crate::mocks`])
//! - **Production**: the real credential table, federated provider SDK,
//!   and durable key/value storage
//!
//! The two identity tracks never share an adapter: staff credentials go
//! through [`CredentialStore`] only, customers through [`IdentityProvider`]
//! only.

use crate::state::{StaffId, StaffRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod credentials;
pub mod identity;
pub mod session_cache;

pub use credentials::CredentialStore;
pub use identity::IdentityProvider;
pub use session_cache::SessionCache;

/// Staff account row as stored in the remote credential table.
///
/// Referenced, never cached in full, by the session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    /// Primary key.
    pub id: StaffId,

    /// Unique login name.
    pub username: String,

    /// Salted Argon2id digest in PHC string form.
    pub password_hash: String,

    /// Role the account carries.
    pub role: StaffRole,

    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating the first staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaffAccount {
    /// Unique login name.
    pub username: String,

    /// Salted Argon2id digest in PHC string form.
    pub password_hash: String,

    /// Role the account carries.
    pub role: StaffRole,
}
