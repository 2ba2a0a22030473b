//! Shared mocks for unit tests.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::backend::{
    Backend, BackendError, LoginGrant, LoginRequest, RecruiterRegisterRequest, Registration, TalentRegisterRequest,
};
use crate::gateway::AuthGateway;
use crate::navigation::History;
use crate::profile::{Role, UserProfile};
use crate::session::{SessionOptions, SessionService};
use crate::store::{Credential, CredentialStore, MemoryStore, StoreError};

// =============================================================================
// MockBackend
// =============================================================================

/// Canned behavior for one endpoint.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok,
    Reject(&'static str),
    Unreachable,
    /// Never resolves; exercises deadlines.
    Hang,
    /// Succeeds once the test releases it.
    Wait(Arc<Notify>),
}

impl Reply {
    async fn resolve(&self) -> Result<(), BackendError> {
        match self {
            Self::Ok => Ok(()),
            Self::Reject(message) => Err(BackendError::Rejected { status: Some(401), message: (*message).to_owned() }),
            Self::Unreachable => Err(BackendError::Network("connection refused".into())),
            Self::Hang => std::future::pending().await,
            Self::Wait(release) => {
                release.notified().await;
                Ok(())
            }
        }
    }
}

pub(crate) struct MockBackend {
    login: Reply,
    register: Reply,
    logout: Reply,
    me: Reply,
    token: String,
    profile: UserProfile,
    calls: Mutex<Vec<&'static str>>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            login: Reply::Ok,
            register: Reply::Ok,
            logout: Reply::Ok,
            me: Reply::Ok,
            token: "t1".into(),
            profile: UserProfile::with_role(Role::Talent),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_grant(mut self, token: &str, profile: UserProfile) -> Self {
        self.token = token.to_owned();
        self.profile = profile;
        self
    }

    pub(crate) fn with_login(mut self, reply: Reply) -> Self {
        self.login = reply;
        self
    }

    pub(crate) fn with_register(mut self, reply: Reply) -> Self {
        self.register = reply;
        self
    }

    pub(crate) fn with_logout(mut self, reply: Reply) -> Self {
        self.logout = reply;
        self
    }

    pub(crate) fn with_me(mut self, reply: Reply) -> Self {
        self.me = reply;
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| **c == endpoint).count()
    }

    fn record(&self, endpoint: &'static str) {
        self.calls.lock().unwrap().push(endpoint);
    }
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    async fn login(&self, _request: &LoginRequest) -> Result<LoginGrant, BackendError> {
        self.record("login");
        self.login.resolve().await?;
        Ok(LoginGrant { message: "Logged in".into(), token: self.token.clone(), profile: self.profile.clone() })
    }

    async fn register_talent(&self, request: &TalentRegisterRequest) -> Result<Registration, BackendError> {
        self.record("register_talent");
        self.register.resolve().await?;
        let profile = UserProfile::with_role(Role::Talent).with_field("email", request.email.clone());
        Ok(Registration { message: "Account created".into(), profile: Some(profile) })
    }

    async fn register_recruiter(&self, request: &RecruiterRegisterRequest) -> Result<Registration, BackendError> {
        self.record("register_recruiter");
        self.register.resolve().await?;
        let profile = UserProfile::with_role(Role::Recruiter).with_field("companyName", request.company_name.clone());
        Ok(Registration { message: "Account created".into(), profile: Some(profile) })
    }

    async fn logout(&self, _token: Option<&str>) -> Result<(), BackendError> {
        self.record("logout");
        self.logout.resolve().await
    }

    async fn current_user(&self, _token: &str) -> Result<UserProfile, BackendError> {
        self.record("current_user");
        self.me.resolve().await?;
        Ok(self.profile.clone())
    }
}

// =============================================================================
// FlakyStore
// =============================================================================

/// Memory store whose operations can be made to fail individually.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) fail_read: bool,
    pub(crate) fail_write: bool,
    pub(crate) fail_clear: bool,
}

impl FlakyStore {
    fn unavailable() -> StoreError {
        StoreError::Unavailable("injected failure".into())
    }
}

#[async_trait::async_trait]
impl CredentialStore for FlakyStore {
    async fn read(&self) -> Result<Option<Credential>, StoreError> {
        if self.fail_read {
            return Err(Self::unavailable());
        }
        self.inner.read().await
    }

    async fn write(&self, credential: &Credential) -> Result<(), StoreError> {
        if self.fail_write {
            return Err(Self::unavailable());
        }
        self.inner.write(credential).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        if self.fail_clear {
            return Err(Self::unavailable());
        }
        self.inner.clear().await
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub(crate) fn admin_credential() -> Credential {
    Credential::new("abc", UserProfile::with_role(Role::Admin))
}

pub(crate) struct Harness {
    pub(crate) backend: Arc<MockBackend>,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) history: Arc<History>,
    pub(crate) session: SessionService,
}

pub(crate) fn harness(backend: MockBackend, store: Arc<dyn CredentialStore>) -> Harness {
    harness_with(backend, store, SessionOptions::default())
}

pub(crate) fn harness_with(backend: MockBackend, store: Arc<dyn CredentialStore>, options: SessionOptions) -> Harness {
    let backend = Arc::new(backend);
    let history = Arc::new(History::new());
    let gateway = AuthGateway::new(backend.clone(), store.clone());
    let session = SessionService::new(gateway, history.clone(), options);
    Harness { backend, store, history, session }
}
