//! Integration tests for the session lifecycle: initialization,
//! persisted-session recovery, identity-change re-sync and sign-out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fleetrent_auth::{
    AuthConfig, AuthError, CredentialHasher, NavigationTarget, SessionManager, SessionState,
    StaffRole,
    constants::session_keys,
    mocks::{MockCredentialStore, MockIdentityProvider, MockSessionCache},
    providers::IdentityProvider,
};
use std::sync::Arc;
use std::time::Duration;

type TestManager = SessionManager<MockCredentialStore, MockIdentityProvider, MockSessionCache>;

struct Fixture {
    credentials: MockCredentialStore,
    identity: MockIdentityProvider,
    cache: MockSessionCache,
    manager: Arc<TestManager>,
}

fn fixture() -> Fixture {
    fixture_with_config(AuthConfig::default())
}

fn fixture_with_config(config: AuthConfig) -> Fixture {
    let credentials = MockCredentialStore::new();
    let identity = MockIdentityProvider::new();
    let cache = MockSessionCache::new();
    let manager = Arc::new(
        SessionManager::new(credentials.clone(), identity.clone(), cache.clone(), config)
            .expect("manager construction"),
    );
    Fixture {
        credentials,
        identity,
        cache,
        manager,
    }
}

/// Build a second manager over the same stores, simulating a process
/// restart with the same durable state.
fn restart(fixture: &Fixture) -> Arc<TestManager> {
    Arc::new(
        SessionManager::new(
            fixture.credentials.clone(),
            fixture.identity.clone(),
            fixture.cache.clone(),
            AuthConfig::default(),
        )
        .expect("manager construction"),
    )
}

#[tokio::test]
async fn test_fresh_start_resolves_to_anonymous() {
    let fixture = fixture();

    assert!(fixture.manager.snapshot().await.initializing);
    fixture.manager.initialize().await;

    let snapshot = fixture.manager.snapshot().await;
    assert!(!snapshot.initializing);
    assert_eq!(snapshot.state, SessionState::Anonymous);
}

#[tokio::test]
async fn test_persisted_record_recovers_staff_session() {
    let fixture = fixture();
    fixture.cache.put_sync(session_keys::ACTIVE, "true").unwrap();
    fixture.cache.put_sync(session_keys::ROLE, "assistant").unwrap();
    fixture.cache.put_sync(session_keys::STAFF_ID, "7").unwrap();

    fixture.manager.initialize().await;

    let snapshot = fixture.manager.snapshot().await;
    assert!(matches!(
        snapshot.state,
        SessionState::Staff(s) if s.staff_id.0 == 7 && s.role == StaffRole::Assistant
    ));
}

#[tokio::test]
async fn test_inactive_or_tampered_record_is_not_trusted() {
    // Role strings outside {admin, assistant} are never trusted.
    let fixture = fixture();
    fixture.cache.put_sync(session_keys::ACTIVE, "true").unwrap();
    fixture.cache.put_sync(session_keys::ROLE, "superadmin").unwrap();
    fixture.cache.put_sync(session_keys::STAFF_ID, "7").unwrap();

    fixture.manager.initialize().await;
    assert_eq!(fixture.manager.snapshot().await.state, SessionState::Anonymous);

    // An inactive record is ignored even when role/id are well-formed.
    let fixture = self::fixture();
    fixture.cache.put_sync(session_keys::ACTIVE, "false").unwrap();
    fixture.cache.put_sync(session_keys::ROLE, "admin").unwrap();
    fixture.cache.put_sync(session_keys::STAFF_ID, "1").unwrap();

    fixture.manager.initialize().await;
    assert_eq!(fixture.manager.snapshot().await.state, SessionState::Anonymous);
}

#[tokio::test]
async fn test_concurrent_initialize_resolves_once() {
    let fixture = fixture();
    fixture.identity.set_latency(Some(Duration::from_millis(50))).unwrap();

    let a = fixture.manager.clone();
    let b = fixture.manager.clone();
    tokio::join!(
        async move { a.initialize().await },
        async move { b.initialize().await },
    );

    // The second caller awaited the first resolution instead of issuing
    // a duplicate remote fetch.
    assert_eq!(fixture.identity.current_user_calls(), 1);
    assert!(!fixture.manager.snapshot().await.initializing);
}

#[tokio::test]
async fn test_initialization_timeout_falls_back_to_unauthenticated() {
    let fixture = fixture_with_config(
        AuthConfig::default().with_init_timeout(Some(Duration::from_millis(20))),
    );
    let customer = fixture.identity.add_customer("rider@example.com", "pedal-power").unwrap();
    fixture.identity.emit_change(Some(customer));
    fixture.identity.set_latency(Some(Duration::from_millis(500))).unwrap();

    fixture.manager.initialize().await;

    // The provider hung past the timeout: identity is treated as
    // unresolved, and initialization still completed.
    let snapshot = fixture.manager.snapshot().await;
    assert!(!snapshot.initializing);
    assert_eq!(snapshot.state, SessionState::Anonymous);
}

#[tokio::test]
async fn test_provider_outage_during_initialize_falls_back() {
    let fixture = fixture();
    fixture.identity.set_unavailable(true);

    fixture.manager.initialize().await;

    let snapshot = fixture.manager.snapshot().await;
    assert!(!snapshot.initializing);
    assert_eq!(snapshot.state, SessionState::Anonymous);
}

#[tokio::test]
async fn test_identity_change_notification_resyncs_customer_track() {
    let fixture = fixture();
    fixture.manager.initialize().await;
    assert!(!fixture.manager.is_customer_authenticated().await);

    // External sign-in (e.g. another tab).
    let customer = fixture.identity.add_customer("rider@example.com", "pedal-power").unwrap();
    fixture.identity.emit_change(Some(customer));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(fixture.manager.is_customer_authenticated().await);

    // External expiry.
    fixture.identity.emit_change(None);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!fixture.manager.is_customer_authenticated().await);
}

#[tokio::test]
async fn test_identity_change_never_touches_staff_track() {
    let fixture = fixture();
    let hasher = CredentialHasher::new().unwrap();
    let hash = hasher.hash("secret123").unwrap();
    fixture.credentials.seed_account("aymen", &hash, StaffRole::Admin).unwrap();

    fixture.manager.initialize().await;
    fixture.manager.login_staff("aymen", "secret123").await.unwrap();

    // A customer-track change arrives while staff mode is active: the
    // staff session must keep precedence (per-track last-writer-wins).
    let customer = fixture.identity.add_customer("rider@example.com", "pedal-power").unwrap();
    fixture.manager.handle_identity_change(Some(customer)).await;

    let snapshot = fixture.manager.snapshot().await;
    assert_eq!(snapshot.state.staff_role(), Some(StaffRole::Admin));

    // Once staff signs out and the session re-initializes, the customer
    // identity the provider still holds becomes visible.
    fixture.manager.sign_out().await.unwrap();
    fixture.manager.initialize().await;
    assert!(fixture.manager.is_customer_authenticated().await);
}

#[tokio::test]
async fn test_staff_sign_out_clears_record_and_does_not_resurrect() {
    let fixture = fixture();
    let hasher = CredentialHasher::new().unwrap();
    let hash = hasher.hash("secret123").unwrap();
    fixture.credentials.seed_account("aymen", &hash, StaffRole::Admin).unwrap();

    fixture.manager.initialize().await;
    fixture.manager.login_staff("aymen", "secret123").await.unwrap();
    assert!(!fixture.cache.is_empty().unwrap());

    let target = fixture.manager.sign_out().await.unwrap();

    assert_eq!(target, NavigationTarget::StaffLogin);
    assert!(fixture.cache.is_empty().unwrap());
    assert!(fixture.manager.snapshot().await.initializing);

    // A fresh initialize, and even a fresh process over the same durable
    // state, must not re-establish the staff session.
    fixture.manager.initialize().await;
    assert!(!fixture.manager.is_staff_authenticated().await);

    let restarted = restart(&fixture);
    restarted.initialize().await;
    assert!(!restarted.is_staff_authenticated().await);
}

#[tokio::test]
async fn test_staff_session_survives_restart_via_persisted_record() {
    let fixture = fixture();
    let hasher = CredentialHasher::new().unwrap();
    let hash = hasher.hash("secret123").unwrap();
    fixture.credentials.seed_account("aymen", &hash, StaffRole::Admin).unwrap();

    fixture.manager.initialize().await;
    fixture.manager.login_staff("aymen", "secret123").await.unwrap();

    let restarted = restart(&fixture);
    restarted.initialize().await;
    assert_eq!(restarted.staff_role().await, Some(StaffRole::Admin));
}

#[tokio::test]
async fn test_customer_login_clears_staff_session_and_record() {
    let fixture = fixture();
    let hasher = CredentialHasher::new().unwrap();
    let hash = hasher.hash("secret123").unwrap();
    fixture.credentials.seed_account("aymen", &hash, StaffRole::Admin).unwrap();
    fixture.identity.add_customer("rider@example.com", "pedal-power").unwrap();

    fixture.manager.initialize().await;
    fixture.manager.login_staff("aymen", "secret123").await.unwrap();

    let target = fixture
        .manager
        .login_customer("rider@example.com", "pedal-power")
        .await
        .unwrap();

    assert_eq!(target, NavigationTarget::Home);
    assert!(fixture.manager.is_customer_authenticated().await);
    assert!(!fixture.manager.is_staff_authenticated().await);
    assert!(fixture.cache.is_empty().unwrap());
}

#[tokio::test]
async fn test_customer_sign_out_ends_provider_session() {
    let fixture = fixture();
    fixture.identity.add_customer("rider@example.com", "pedal-power").unwrap();
    fixture.manager.initialize().await;
    fixture
        .manager
        .login_customer("rider@example.com", "pedal-power")
        .await
        .unwrap();

    let target = fixture.manager.sign_out().await.unwrap();

    assert_eq!(target, NavigationTarget::CustomerLogin);
    assert!(!fixture.manager.is_customer_authenticated().await);
    assert_eq!(fixture.identity.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn test_register_customer_signs_in_and_navigates_home() {
    let fixture = fixture();
    fixture.manager.initialize().await;

    let target = fixture
        .manager
        .register_customer("new-rider@example.com", "pedal-power")
        .await
        .unwrap();

    assert_eq!(target, NavigationTarget::Home);
    assert!(fixture.manager.is_customer_authenticated().await);
}

#[tokio::test]
async fn test_register_customer_surfaces_validation_errors() {
    let fixture = fixture();
    fixture.manager.initialize().await;

    let result = fixture.manager.register_customer("not-an-email", "pedal-power").await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
    assert_eq!(fixture.manager.snapshot().await.state, SessionState::Anonymous);
}
