//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider
//! traits for use in unit and integration tests. Each mock is `Clone`
//! (shared interior state), so a test can hand one copy to the session
//! manager and keep another for seeding and assertions. The credential
//! store and identity provider mocks support failure injection to
//! exercise the `Unavailable` paths.

pub mod credentials;
pub mod identity;
pub mod session_cache;

pub use credentials::MockCredentialStore;
pub use identity::MockIdentityProvider;
pub use session_cache::MockSessionCache;
