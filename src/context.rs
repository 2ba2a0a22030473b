//! Session provider and scoped access to the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`SessionProvider`] owns the process's [`SessionService`] and hands out
//! [`Scope`]s to everything rendered beneath it. Code holding a scope that
//! did not come from a provider gets [`ContextError::Unavailable`]: that is
//! a wiring mistake and is the one error allowed to reach the caller.
//!
//! DESIGN
//! ======
//! Mounting the provider schedules the single initial check. Until that
//! check completes the provider renders a placeholder instead of its
//! children, so nothing downstream can observe the pre-hydration state.

use crate::session::{Session, SessionService};

/// What a provider or guard produces for its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render<V> {
    /// Empty stand-in shown until the session is known.
    Placeholder,
    /// Render nothing; a redirect has been issued instead.
    Nothing,
    Content(V),
}

impl<V> Render<V> {
    #[must_use]
    pub fn content(self) -> Option<V> {
        match self {
            Self::Content(v) => Some(v),
            Self::Placeholder | Self::Nothing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("session context is unavailable outside of a session provider")]
    Unavailable,
}

// =============================================================================
// SCOPE
// =============================================================================

/// Position in the view tree. Scopes below a provider can reach the session.
#[derive(Clone, Default)]
pub struct Scope {
    session: Option<SessionService>,
}

impl Scope {
    /// A scope with no provider above it.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Scope for a nested view; inherits whatever its parent can reach.
    #[must_use]
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// # Errors
    ///
    /// Returns [`ContextError::Unavailable`] when no provider encloses this scope.
    pub fn use_session(&self) -> Result<&SessionService, ContextError> {
        self.session.as_ref().ok_or(ContextError::Unavailable)
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

pub struct SessionProvider {
    service: SessionService,
}

impl SessionProvider {
    /// Mount the provider and schedule the initial check. Must be called from
    /// within a Tokio runtime.
    #[must_use]
    pub fn mount(service: SessionService) -> Self {
        if service.hydrate().is_some() {
            tracing::debug!("initial auth check scheduled");
        }
        Self { service }
    }

    #[must_use]
    pub fn scope(&self) -> Scope {
        Scope { session: Some(self.service.clone()) }
    }

    #[must_use]
    pub fn session(&self) -> &SessionService {
        &self.service
    }

    /// Render children once hydrated; a placeholder before that.
    pub fn render<V>(&self, children: impl FnOnce(&Scope) -> V) -> Render<V> {
        if !self.service.is_hydrated() {
            return Render::Placeholder;
        }
        Render::Content(children(&self.scope()))
    }

    /// Wait for the initial check to finish.
    pub async fn ready(&self) -> Session {
        self.service.wait_hydrated().await
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
