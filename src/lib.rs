//! Session and access-control core for the job-matching client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client keeps one [`SessionService`] per process. It is reconciled
//! with a durable [`CredentialStore`] at start-up, updated by the login and
//! logout flows of the [`AuthGateway`], and consumed by [`RouteGuard`]s that
//! gate role-restricted views.
//!
//! ```text
//! SessionProvider ── Scope ──> RouteGuard ──> Navigator (redirects)
//!        │
//!  SessionService ── AuthGateway ──┬── Backend (HTTP)
//!        │                         └── CredentialStore (file / memory)
//!        └── check_credentials ────────┘
//! ```

pub mod backend;
pub mod check;
pub mod config;
pub mod context;
pub mod gateway;
pub mod guard;
pub mod navigation;
pub mod profile;
pub mod session;
pub mod store;
pub mod validate;

pub use backend::{Backend, BackendError, HttpBackend};
pub use check::{CheckOutcome, CheckPolicy};
pub use config::{ConfigError, SessionConfig};
pub use context::{ContextError, Render, Scope, SessionProvider};
pub use gateway::{AuthGateway, AuthResponse, GatewayError};
pub use guard::{Access, GuardState, RouteGuard};
pub use navigation::{History, Navigator, Routes};
pub use profile::{Role, UserProfile};
pub use session::{Session, SessionOptions, SessionService};
pub use store::{Credential, CredentialStore, FileStore, MemoryStore, StoreError};
pub use validate::{LoginForm, RecruiterSignupForm, TalentSignupForm, ValidationError};

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
