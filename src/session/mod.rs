//! Session service: the client's belief about who is logged in.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionService`] is constructed per client process and injected
//! wherever the session is needed. Views subscribe to [`Session`] snapshots;
//! the route guard re-evaluates on every change.
//!
//! DESIGN
//! ======
//! State lives in a `watch` channel and is only mutated by the service's own
//! operations (`check_auth`, `login`, `logout`). There are no raw setters:
//! a user is present exactly when the session is authenticated.
//!
//! Operations take an async operation lock, so results land in call order.
//! Logout is the exception: its local reset happens before it queues, and
//! it bumps a generation counter so any operation already in flight cannot
//! re-authenticate the session when it settles.
//!
//! `loading` is cleared by a drop guard, so an operation that is aborted or
//! times out still releases it. Every operation runs under a deadline.

pub mod gate;

pub use gate::HydrationGate;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::check::{CheckOutcome, CheckPolicy, check_credentials};
use crate::config::{DEFAULT_OPERATION_TIMEOUT_SECS, SessionConfig};
use crate::gateway::{AuthGateway, AuthResponse};
use crate::navigation::{Navigator, Routes};
use crate::profile::{Role, UserProfile};
use crate::validate::LoginForm;

pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";

// =============================================================================
// SESSION SNAPSHOT
// =============================================================================

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Option<UserProfile>,
    pending: usize,
    hydrated: bool,
}

impl Session {
    fn initial() -> Self {
        Self { user: None, pending: 0, hydrated: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.user.as_ref().and_then(UserProfile::role)
    }

    /// True while an operation is in flight, and before the first check
    /// has completed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending > 0 || !self.hydrated
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub routes: Routes,
    pub check_policy: CheckPolicy,
    /// Deadline for each operation, end to end.
    pub deadline: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            routes: Routes::default(),
            check_policy: CheckPolicy::TrustLocal,
            deadline: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self { routes: config.routes.clone(), check_policy: config.check_policy, deadline: config.timeouts.operation }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

struct Inner {
    gateway: AuthGateway,
    navigator: Arc<dyn Navigator>,
    options: SessionOptions,
    state: watch::Sender<Session>,
    gate: HydrationGate,
    op_lock: Mutex<()>,
    /// Bumped by every logout; results from older operations are discarded.
    generation: AtomicU64,
    initial_check_scheduled: AtomicBool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Check,
    Login,
    Logout,
}

/// Marks an operation as in flight for as long as it lives.
struct InFlight {
    inner: Arc<Inner>,
    op: Op,
    generation: u64,
    settled: bool,
}

impl InFlight {
    fn begin(inner: &Arc<Inner>, op: Op) -> Self {
        inner.state.send_modify(|s| s.pending += 1);
        let generation = inner.generation.load(Ordering::SeqCst);
        Self { inner: Arc::clone(inner), op, generation, settled: false }
    }

    fn settle(&mut self, user: Option<UserProfile>) {
        self.settled = true;
        if self.inner.generation.load(Ordering::SeqCst) != self.generation {
            debug!(op = ?self.op, "logout happened mid-operation; result discarded");
            return;
        }
        self.inner.state.send_modify(|s| s.user = user);
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let is_check = self.op == Op::Check;
        // A check that never settled was aborted; that counts as a failed check.
        let abandoned = is_check && !self.settled;
        self.inner.state.send_modify(|s| {
            if abandoned {
                s.user = None;
            }
            s.pending = s.pending.saturating_sub(1);
            if is_check {
                s.hydrated = true;
            }
        });
        if abandoned {
            warn!("auth check abandoned before completion; session reset");
        }
        if is_check {
            self.inner.open_gate();
        }
    }
}

/// Owned by the initial check's task from the moment it is spawned. Hydrates
/// the session when dropped, even if the task never got the op lock.
struct HydrateOnDrop {
    inner: Arc<Inner>,
}

impl Drop for HydrateOnDrop {
    fn drop(&mut self) {
        if self.inner.gate.is_open() {
            return;
        }
        warn!("initial auth check dropped before it ran; hydrating with current session");
        self.inner.state.send_modify(|s| s.hydrated = true);
        self.inner.open_gate();
    }
}

impl Inner {
    fn open_gate(&self) {
        if self.gate.open() {
            info!("session hydrated");
        }
    }
}

/// Handle to the process-wide session. Cheap to clone.
#[derive(Clone)]
pub struct SessionService {
    inner: Arc<Inner>,
}

impl SessionService {
    #[must_use]
    pub fn new(gateway: AuthGateway, navigator: Arc<dyn Navigator>, options: SessionOptions) -> Self {
        let (state, _rx) = watch::channel(Session::initial());
        let inner = Inner {
            gateway,
            navigator,
            options,
            state,
            gate: HydrationGate::new(),
            op_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            initial_check_scheduled: AtomicBool::new(false),
        };
        Self { inner: Arc::new(inner) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn gateway(&self) -> &AuthGateway {
        &self.inner.gateway
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    #[must_use]
    pub fn routes(&self) -> &Routes {
        &self.inner.options.routes
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.inner.gate.is_open()
    }

    /// Resolve once the first check has completed.
    pub async fn wait_hydrated(&self) -> Session {
        self.inner.gate.wait().await;
        self.snapshot()
    }

    /// Schedule the initial check. Only the first call spawns a task; later
    /// calls return `None`. If the task is aborted at any point, including
    /// before it is first polled, the session still hydrates.
    pub fn hydrate(&self) -> Option<JoinHandle<Session>> {
        if self.inner.initial_check_scheduled.swap(true, Ordering::SeqCst) {
            return None;
        }
        let hydration = HydrateOnDrop { inner: Arc::clone(&self.inner) };
        let service = self.clone();
        Some(tokio::spawn(async move {
            let _hydration = hydration;
            service.check_auth().await
        }))
    }

    /// Reconcile the session with the credential store. Any failure, including
    /// a missed deadline, resolves to logged out.
    pub async fn check_auth(&self) -> Session {
        let _op = self.inner.op_lock.lock().await;
        let mut flight = InFlight::begin(&self.inner, Op::Check);

        let deadline = self.inner.options.deadline;
        let check = check_credentials(&self.inner.gateway, self.inner.options.check_policy);
        let outcome = match tokio::time::timeout(deadline, check).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(?deadline, "auth check timed out");
                CheckOutcome::Unauthenticated
            }
        };
        debug!(authenticated = outcome.is_authenticated(), "auth check finished");
        flight.settle(outcome.into_user());
        drop(flight);

        self.snapshot()
    }

    /// Run the login flow and, on success, mark the session authenticated.
    pub async fn login(&self, form: &LoginForm) -> AuthResponse<UserProfile> {
        let _op = self.inner.op_lock.lock().await;
        let mut flight = InFlight::begin(&self.inner, Op::Login);

        let deadline = self.inner.options.deadline;
        let response = match tokio::time::timeout(deadline, self.inner.gateway.login(form)).await {
            Ok(response) => response,
            Err(_) => {
                warn!(?deadline, "login timed out");
                AuthResponse::failure(TIMEOUT_MESSAGE)
            }
        };

        if response.success {
            if let Some(profile) = response.data.clone() {
                flight.settle(Some(profile));
            }
        }
        response
    }

    /// Log out. The local session is reset and the redirect fired before any
    /// remote work starts; a failed remote clear is logged and otherwise
    /// ignored.
    pub async fn logout(&self) {
        self.complete_logout();
        self.inner.navigator.redirect(&self.inner.options.routes.login);
        self.inner.navigator.refresh();

        let _flight = InFlight::begin(&self.inner, Op::Logout);
        let _op = self.inner.op_lock.lock().await;

        let deadline = self.inner.options.deadline;
        match tokio::time::timeout(deadline, self.inner.gateway.logout()).await {
            Ok(response) if response.success => {}
            Ok(response) => warn!(message = %response.message, "credential clear failed; local session already reset"),
            Err(_) => warn!(?deadline, "logout timed out; local session already reset"),
        }
    }

    fn complete_logout(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_modify(|s| s.user = None);
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
