//! Route guard: gates a subtree on the session and a required access level.
//!
//! SYSTEM CONTEXT
//! ==============
//! A guard is mounted under a [`SessionProvider`](crate::context::SessionProvider)
//! and re-evaluated whenever the session changes. It never returns a redirect
//! as something to render: redirects go through the session's navigator and
//! the guard renders nothing.
//!
//! DESIGN
//! ======
//! States: `Checking -> Redirecting -> Denied` or `Checking -> Allowed`.
//! The guard remembers the session fields it last evaluated against
//! (authenticated, loading, hydrated, role) and only re-runs when one of them
//! changes. Each entry into `Redirecting` fires exactly one redirect.
//! [`RouteGuard::settle`] waits out the initial `Checking` phase;
//! [`RouteGuard::next_change`] keeps a mounted guard following the session.

use tokio::sync::watch;
use tracing::{debug, info};

use crate::context::{ContextError, Render, Scope};
use crate::profile::{Role, UserProfile};
use crate::session::{Session, SessionService};

/// What the guarded subtree requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Any logged-in user.
    Authenticated,
    /// A logged-in user with exactly this role.
    Role(Role),
}

impl Access {
    /// Access implied by a route. Paths under a known role's landing view
    /// (`/admin`, `/talent/...`, `/recruiter/...`) need that role; anything
    /// else needs a logged-in user.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        [Role::Admin, Role::Talent, Role::Recruiter]
            .into_iter()
            .find(|role| role.home_route().and_then(section).is_some_and(|prefix| under(path, prefix)))
            .map_or(Self::Authenticated, Self::Role)
    }

    fn admits(&self, user: &UserProfile) -> bool {
        match self {
            Self::Authenticated => true,
            Self::Role(role) => user.has_role(role),
        }
    }
}

/// First segment of a route, with its leading slash.
fn section(route: &str) -> Option<&str> {
    let rest = route.strip_prefix('/')?;
    let end = rest.find('/').map_or(route.len(), |i| i + 1);
    Some(&route[..end])
}

fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    /// Redirect to the contained route has been requested.
    Redirecting(String),
    Denied,
    Allowed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Observed {
    authenticated: bool,
    loading: bool,
    hydrated: bool,
    role: Option<Role>,
}

impl Observed {
    fn of(session: &Session) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            loading: session.is_loading(),
            hydrated: session.is_hydrated(),
            role: session.role().cloned(),
        }
    }
}

pub struct RouteGuard {
    session: SessionService,
    access: Access,
    state: GuardState,
    observed: Option<Observed>,
}

impl RouteGuard {
    /// Mount a guard for `access` and evaluate it against the current session.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Unavailable`] when `scope` is not under a provider.
    pub fn mount(scope: &Scope, access: Access) -> Result<Self, ContextError> {
        let session = scope.use_session()?.clone();
        let mut guard = Self { session, access, state: GuardState::Checking, observed: None };
        let snapshot = guard.session.snapshot();
        guard.evaluate(&snapshot);
        Ok(guard)
    }

    #[must_use]
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    #[must_use]
    pub fn access(&self) -> &Access {
        &self.access
    }

    /// Re-run the transition logic if any observed session field changed.
    pub fn evaluate(&mut self, session: &Session) -> &GuardState {
        let observed = Observed::of(session);
        if self.observed.as_ref() == Some(&observed) {
            return &self.state;
        }
        self.observed = Some(observed);
        self.state = GuardState::Checking;

        if session.is_loading() || !session.is_hydrated() {
            return &self.state;
        }

        let routes = self.session.routes();
        let target = match session.user() {
            None => Some(routes.login.clone()),
            Some(user) if !self.access.admits(user) => Some(routes.unauthorized.clone()),
            Some(_) => None,
        };

        match target {
            Some(route) => self.redirect(route),
            None => {
                debug!(access = ?self.access, "route allowed");
                self.state = GuardState::Allowed;
            }
        }
        &self.state
    }

    fn redirect(&mut self, route: String) {
        self.state = GuardState::Redirecting(route.clone());
        info!(access = ?self.access, %route, "route guard redirecting");
        self.session.navigator().redirect(&route);
        self.state = GuardState::Denied;
    }

    /// Follow session changes until the guard leaves `Checking`.
    pub async fn settle(&mut self, rx: &mut watch::Receiver<Session>) -> &GuardState {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            self.evaluate(&snapshot);
            if self.state != GuardState::Checking || rx.changed().await.is_err() {
                break;
            }
        }
        &self.state
    }

    /// Wait for the next session change that moves the guard to a different
    /// state, and return that state. Returns `None` once the session is gone.
    ///
    /// Hosts without a render pass of their own call this in a loop to keep a
    /// mounted guard current.
    pub async fn next_change(&mut self, rx: &mut watch::Receiver<Session>) -> Option<GuardState> {
        let before = self.state.clone();
        loop {
            rx.changed().await.ok()?;
            let snapshot = rx.borrow_and_update().clone();
            if *self.evaluate(&snapshot) != before {
                return Some(self.state.clone());
            }
        }
    }

    /// Render children only when access is allowed.
    pub fn render<V>(&self, children: impl FnOnce() -> V) -> Render<V> {
        match self.state {
            GuardState::Allowed => Render::Content(children()),
            GuardState::Checking => Render::Placeholder,
            GuardState::Redirecting(_) | GuardState::Denied => Render::Nothing,
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
