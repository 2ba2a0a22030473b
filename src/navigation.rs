//! Navigation side effects fired by the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Logout and the route guard redirect as a side effect; they never return a
//! redirect as a renderable value. The host application supplies the
//! [`Navigator`] that performs the actual route change.

use std::sync::Mutex;

use crate::config::{DEFAULT_LOGIN_ROUTE, DEFAULT_UNAUTHORIZED_ROUTE};

/// Well-known views the core redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// Unauthenticated entry view.
    pub login: String,
    /// Authenticated-but-unauthorized view.
    pub unauthorized: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self { login: DEFAULT_LOGIN_ROUTE.to_owned(), unauthorized: DEFAULT_UNAUTHORIZED_ROUTE.to_owned() }
    }
}

pub trait Navigator: Send + Sync {
    /// Replace the current view with `route`.
    fn redirect(&self, route: &str);

    /// Re-evaluate server-rendered data that depends on the session.
    fn refresh(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Redirect(String),
    Refresh,
}

/// Headless navigator that keeps an in-memory history of side effects.
#[derive(Debug, Default)]
pub struct History {
    events: Mutex<Vec<NavEvent>>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Routes redirected to, oldest first.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NavEvent::Redirect(route) => Some(route),
                NavEvent::Refresh => None,
            })
            .collect()
    }

    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.redirects().pop()
    }

    fn push(&self, event: NavEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Navigator for History {
    fn redirect(&self, route: &str) {
        tracing::info!(%route, "redirect");
        self.push(NavEvent::Redirect(route.to_owned()));
    }

    fn refresh(&self) {
        tracing::debug!("refresh session-dependent data");
        self.push(NavEvent::Refresh);
    }
}
