//! Session manager.
//!
//! Owns the unified in-memory session state and orchestrates the three
//! providers: the credential store (staff track), the federated identity
//! provider (customer track) and the persisted session store (staff
//! session recovery across restarts).
//!
//! # Concurrency
//!
//! Every state-mutating operation serializes on one async mutex, held
//! across the operation's remote calls. That gives the two properties the
//! engine needs under concurrent navigation:
//!
//! - at most one in-flight `initialize()` resolution (a second caller
//!   awaits the first and then returns immediately);
//! - no interleaved partial writes between logins, sign-outs and the
//!   identity-change listener. Last-writer-wins applies per identity
//!   track only; a customer-track update can never clobber the staff
//!   track.

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::navigation::NavigationTarget;
use crate::password::CredentialHasher;
use crate::providers::session_cache::{clear_staff_session, load_staff_session, store_staff_session};
use crate::providers::{CredentialStore, IdentityProvider, NewStaffAccount, SessionCache};
use crate::state::{CustomerIdentity, SessionSnapshot, SessionState, StaffRole, StaffSession};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The two identity tracks plus the initialization flags.
///
/// Private to the manager; the outside world only sees
/// [`SessionSnapshot`]s derived from it.
#[derive(Debug, Default)]
struct SessionData {
    /// Customer track, mirrored from the federated provider.
    customer: Option<CustomerIdentity>,

    /// Staff track, set only after a verification against the credential
    /// store (or recovered from the persisted record of one).
    staff: Option<StaffSession>,

    /// True until the first resolution of both identity sources.
    initializing: bool,

    /// Cache of "does at least one staff account exist". Only a positive
    /// answer is cached; a negative one is re-checked so an out-of-band
    /// bootstrap is picked up.
    bootstrapped: Option<bool>,
}

impl SessionData {
    /// Authorization-facing view. Staff takes precedence when both
    /// tracks are populated.
    fn state(&self) -> SessionState {
        if let Some(staff) = self.staff {
            SessionState::Staff(staff)
        } else if let Some(customer) = self.customer.clone() {
            SessionState::Customer(customer)
        } else {
            SessionState::Anonymous
        }
    }
}

/// Session manager.
///
/// Explicitly constructed and injected wherever session facts are needed
/// (usually behind an [`Arc`], shared with the [`crate::RouteGuard`]).
/// There is no ambient global instance.
pub struct SessionManager<C, I, S> {
    credentials: C,
    identity: I,
    cache: S,
    hasher: CredentialHasher,
    config: AuthConfig,
    inner: Mutex<SessionData>,
    /// Identity-change listener task, spawned once on first initialize.
    listener: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<C, I, S> SessionManager<C, I, S>
where
    C: CredentialStore,
    I: IdentityProvider,
    S: SessionCache,
{
    /// Create a manager over the three providers.
    ///
    /// The manager starts in the initializing state; call
    /// [`initialize`](Self::initialize) (or let the guard do it) before
    /// reading authorization facts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the credential hasher cannot be
    /// constructed.
    pub fn new(credentials: C, identity: I, cache: S, config: AuthConfig) -> Result<Self> {
        Ok(Self {
            credentials,
            identity,
            cache,
            hasher: CredentialHasher::new()?,
            config,
            inner: Mutex::new(SessionData {
                initializing: true,
                ..SessionData::default()
            }),
            listener: std::sync::Mutex::new(None),
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Derived Facts
    // ═══════════════════════════════════════════════════════════════════

    /// Read-only view of the session at this instant.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let data = self.inner.lock().await;
        SessionSnapshot {
            state: data.state(),
            initializing: data.initializing,
        }
    }

    /// Is a staff member authenticated right now?
    pub async fn is_staff_authenticated(&self) -> bool {
        self.inner.lock().await.staff.is_some()
    }

    /// Is a customer authenticated right now (staff mode excluded)?
    pub async fn is_customer_authenticated(&self) -> bool {
        let data = self.inner.lock().await;
        data.staff.is_none() && data.customer.is_some()
    }

    /// Role of the authenticated staff member, if any.
    pub async fn staff_role(&self) -> Option<StaffRole> {
        self.inner.lock().await.staff.map(|s| s.role)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve both identity sources and mark the session ready.
    ///
    /// Fetches the current federated user, restores the staff session
    /// from the persisted record (if an active, well-formed one exists)
    /// and subscribes to provider change notifications. Safe to call from
    /// any number of concurrent navigations: callers serialize on the
    /// session mutex, the first does the work, the rest observe the
    /// completed state and return without issuing duplicate fetches.
    ///
    /// A failed or timed-out source read is logged and treated as
    /// unresolved (unauthenticated for that track) so a hung remote end
    /// cannot hang navigation forever; see [`AuthConfig::init_timeout`].
    pub async fn initialize(self: &Arc<Self>)
    where
        C: 'static,
        I: 'static,
        S: 'static,
    {
        let mut data = self.inner.lock().await;
        if !data.initializing {
            return;
        }

        let customer = self
            .resolve("identity-provider", self.identity.current_user())
            .await
            .flatten();
        let staff = self
            .resolve("session-cache", load_staff_session(&self.cache))
            .await
            .flatten();

        data.customer = customer;
        data.staff = staff;
        data.initializing = false;
        info!(
            staff = data.staff.is_some(),
            customer = data.customer.is_some(),
            "session initialized"
        );
        drop(data);

        self.spawn_change_listener();
    }

    /// Re-sync the customer track from a provider change notification.
    ///
    /// Invoked by the spawned listener on every provider-side session
    /// change (including external expiry); may also be driven manually.
    /// Only the customer track is touched: an in-progress or established
    /// staff session is never affected.
    pub async fn handle_identity_change(&self, identity: Option<CustomerIdentity>) {
        let mut data = self.inner.lock().await;
        debug!(present = identity.is_some(), "federated identity changed");
        data.customer = identity;
    }

    /// Does at least one staff account exist?
    ///
    /// Routes first-run navigation to the setup flow instead of the staff
    /// login. A positive answer is cached.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unavailable`] if the credential store is
    /// unreachable.
    pub async fn check_setup_complete(&self) -> Result<bool> {
        let mut data = self.inner.lock().await;
        if data.bootstrapped == Some(true) {
            return Ok(true);
        }
        let exists = self.credentials.has_accounts().await?;
        data.bootstrapped = Some(exists);
        Ok(exists)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Staff Track
    // ═══════════════════════════════════════════════════════════════════

    /// Create the first staff account (role Admin, configured bootstrap
    /// username) and sign it in immediately.
    ///
    /// The single-use property is enforced by the credential store, not
    /// assumed here: a concurrent or out-of-band account creation makes
    /// the insert fail with `Conflict` and leaves everything unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Any staff account already exists → [`AuthError::Conflict`]
    /// - The store or session cache is unreachable →
    ///   [`AuthError::Unavailable`]
    pub async fn bootstrap_first_admin(&self, password: &str) -> Result<NavigationTarget> {
        let password_hash = self.hasher.hash(password)?;

        let mut data = self.inner.lock().await;
        let staff_id = self
            .credentials
            .insert_first_account(NewStaffAccount {
                username: self.config.bootstrap_username.clone(),
                password_hash,
                role: StaffRole::Admin,
            })
            .await?;

        let session = StaffSession {
            staff_id,
            role: StaffRole::Admin,
        };
        store_staff_session(&self.cache, session).await?;
        data.staff = Some(session);
        data.bootstrapped = Some(true);
        info!(%staff_id, "first admin bootstrapped and signed in");
        Ok(landing_for(StaffRole::Admin))
    }

    /// Verify staff credentials and establish a staff session.
    ///
    /// An unknown username and a wrong password both fail with the same
    /// [`AuthError::InvalidCredentials`]; the unknown-username path burns
    /// a dummy verification so the two take comparable time. On success
    /// the persisted record is written and the role-dependent landing
    /// returned (Admin → metrics, Assistant → reservations). On any
    /// failure the session state is untouched and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Credentials do not match → [`AuthError::InvalidCredentials`]
    /// - The store or session cache is unreachable →
    ///   [`AuthError::Unavailable`]
    pub async fn login_staff(&self, username: &str, password: &str) -> Result<NavigationTarget> {
        let mut data = self.inner.lock().await;

        let Some(account) = self.credentials.find_by_username(username).await? else {
            self.hasher.verify_dummy(password);
            debug!("staff login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            debug!(staff_id = %account.id, "staff login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = StaffSession {
            staff_id: account.id,
            role: account.role,
        };
        store_staff_session(&self.cache, session).await?;
        data.staff = Some(session);
        info!(staff_id = %account.id, role = %account.role, "staff signed in");
        Ok(landing_for(account.role))
    }

    /// Rotate the authenticated staff member's password.
    ///
    /// Re-fetches the stored digest for the active staff session and
    /// verifies the current password against it before writing the new
    /// one. A mismatch leaves the stored digest unmodified.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No staff session is active → [`AuthError::NotAuthenticated`]
    /// - The current password is wrong → [`AuthError::InvalidCredentials`]
    /// - The account row has vanished → [`AuthError::AccountNotFound`]
    /// - The store is unreachable → [`AuthError::Unavailable`]
    pub async fn change_staff_password(&self, current: &str, new: &str) -> Result<()> {
        let data = self.inner.lock().await;
        let Some(staff) = data.staff else {
            return Err(AuthError::NotAuthenticated);
        };

        let account = self
            .credentials
            .find_by_id(staff.staff_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !self.hasher.verify(current, &account.password_hash)? {
            debug!(staff_id = %staff.staff_id, "password rotation rejected: current password incorrect");
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = self.hasher.hash(new)?;
        self.credentials
            .update_password_hash(staff.staff_id, &new_hash, Utc::now())
            .await?;
        info!(staff_id = %staff.staff_id, "staff password rotated");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Customer Track
    // ═══════════════════════════════════════════════════════════════════

    /// Sign a customer in through the federated provider.
    ///
    /// On success the customer track is set and any staff session is
    /// dropped, in memory and in the persisted record (mutual exclusion
    /// between the tracks).
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider rejects the credentials, surfaced verbatim →
    ///   [`AuthError::InvalidCredentials`]
    /// - The provider or session cache is unreachable →
    ///   [`AuthError::Unavailable`]
    pub async fn login_customer(&self, email: &str, password: &str) -> Result<NavigationTarget> {
        let mut data = self.inner.lock().await;
        let identity = self.identity.sign_in(email, password).await?;

        clear_staff_session(&self.cache).await?;
        data.staff = None;
        data.customer = Some(identity);
        info!("customer signed in");
        Ok(NavigationTarget::Home)
    }

    /// Register a new customer with the federated provider.
    ///
    /// Same mutual-exclusion and navigation semantics as
    /// [`login_customer`](Self::login_customer).
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider rejects the input → [`AuthError::Validation`]
    /// - The provider or session cache is unreachable →
    ///   [`AuthError::Unavailable`]
    pub async fn register_customer(&self, email: &str, password: &str) -> Result<NavigationTarget> {
        let mut data = self.inner.lock().await;
        let identity = self.identity.sign_up(email, password).await?;

        clear_staff_session(&self.cache).await?;
        data.staff = None;
        data.customer = Some(identity);
        info!("customer registered and signed in");
        Ok(NavigationTarget::Home)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Sign-Out
    // ═══════════════════════════════════════════════════════════════════

    /// End the current session, whichever track it is on.
    ///
    /// Staff mode: clears the staff track and the persisted record, then
    /// signals the staff login view. Customer mode: ends the provider
    /// session and signals the customer login view. Either way the
    /// manager re-arms `initializing`, so the next navigation forces a
    /// fresh resolution of both identity sources.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unavailable`] if the provider or session
    /// cache is unreachable.
    pub async fn sign_out(&self) -> Result<NavigationTarget> {
        let mut data = self.inner.lock().await;
        if data.staff.is_some() {
            clear_staff_session(&self.cache).await?;
            data.staff = None;
            data.initializing = true;
            info!("staff signed out");
            Ok(NavigationTarget::StaffLogin)
        } else {
            self.identity.sign_out().await?;
            data.customer = None;
            data.initializing = true;
            info!("customer signed out");
            Ok(NavigationTarget::CustomerLogin)
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════

    /// Run one initialization read with the configured timeout.
    ///
    /// Timeouts and upstream failures resolve to `None` instead of
    /// failing initialization: the guard then takes its unauthenticated
    /// branch rather than hanging or flashing a wrong decision.
    async fn resolve<T, F>(&self, source: &str, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        let outcome = match self.config.init_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(source, "initialization read timed out, treating as unresolved");
                    return None;
                }
            },
            None => fut.await,
        };

        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(source, error = %e, "initialization read failed, treating as unresolved");
                None
            }
        }
    }

    /// Spawn the identity-change listener exactly once.
    fn spawn_change_listener(self: &Arc<Self>)
    where
        C: 'static,
        I: 'static,
        S: 'static,
    {
        let Ok(mut slot) = self.listener.lock() else {
            warn!("identity-change listener slot poisoned, not spawning");
            return;
        };
        if slot.is_some() {
            return;
        }

        let manager = Arc::clone(self);
        let mut rx = self.identity.subscribe();
        *slot = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let identity = rx.borrow_and_update().clone();
                manager.handle_identity_change(identity).await;
            }
        }));
    }
}

impl<C, I, S> Drop for SessionManager<C, I, S> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

/// Role-dependent landing after a successful staff sign-in.
const fn landing_for(role: StaffRole) -> NavigationTarget {
    match role {
        StaffRole::Admin => NavigationTarget::StaffMetrics,
        StaffRole::Assistant => NavigationTarget::StaffReservations,
    }
}
