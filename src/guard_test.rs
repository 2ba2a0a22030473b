use std::sync::Arc;

use super::*;
use crate::context::SessionProvider;
use crate::store::{Credential, MemoryStore};
use crate::test_helpers::{Harness, MockBackend, admin_credential, harness};
use crate::validate::LoginForm;

fn stored(role: Role) -> Harness {
    let credential = Credential::new("abc", UserProfile::with_role(role));
    harness(MockBackend::new(), Arc::new(MemoryStore::with_credential(credential)))
}

async fn hydrated_scope(h: &Harness) -> Scope {
    let provider = SessionProvider::mount(h.session.clone());
    provider.ready().await;
    provider.scope()
}

#[test]
fn mount_outside_provider_fails_loudly() {
    let err = RouteGuard::mount(&Scope::root(), Access::Authenticated).err();
    assert_eq!(err, Some(ContextError::Unavailable));
}

#[tokio::test]
async fn checking_until_hydrated() {
    let h = harness(MockBackend::new(), Arc::new(MemoryStore::with_credential(admin_credential())));
    let provider = SessionProvider::mount(h.session.clone());
    let guard = RouteGuard::mount(&provider.scope(), Access::Role(Role::Admin)).unwrap();

    assert_eq!(guard.state(), &GuardState::Checking);
    assert_eq!(guard.render(|| "admin"), Render::Placeholder);
    assert!(h.history.redirects().is_empty());
}

#[tokio::test]
async fn unauthenticated_redirects_to_login() {
    let h = harness(MockBackend::new(), Arc::new(MemoryStore::new()));
    let scope = hydrated_scope(&h).await;

    let guard = RouteGuard::mount(&scope, Access::Authenticated).unwrap();

    assert_eq!(guard.state(), &GuardState::Denied);
    assert_eq!(guard.render(|| "home"), Render::Nothing);
    assert_eq!(h.history.redirects(), vec!["/login".to_owned()]);
}

#[tokio::test]
async fn matching_role_is_allowed() {
    let h = stored(Role::Admin);
    let scope = hydrated_scope(&h).await;

    let guard = RouteGuard::mount(&scope, Access::Role(Role::Admin)).unwrap();

    assert_eq!(guard.state(), &GuardState::Allowed);
    assert_eq!(guard.render(|| "admin"), Render::Content("admin"));
    assert!(h.history.redirects().is_empty());
}

#[tokio::test]
async fn wrong_role_denied_with_single_redirect() {
    let h = stored(Role::Talent);
    let scope = hydrated_scope(&h).await;

    let mut guard = RouteGuard::mount(&scope, Access::Role(Role::Admin)).unwrap();
    assert_eq!(guard.state(), &GuardState::Denied);

    // Unchanged session: no re-run, no second redirect.
    let snapshot = h.session.snapshot();
    guard.evaluate(&snapshot);
    guard.evaluate(&snapshot);

    assert_eq!(h.history.redirects(), vec!["/unauthorized".to_owned()]);
}

#[tokio::test]
async fn unknown_role_is_unauthorized() {
    let h = stored(Role::parse("moderator"));
    let scope = hydrated_scope(&h).await;

    let guard = RouteGuard::mount(&scope, Access::Role(Role::parse("moderator"))).unwrap();

    assert_eq!(guard.state(), &GuardState::Denied);
    assert_eq!(h.history.current().as_deref(), Some("/unauthorized"));
}

#[tokio::test]
async fn reruns_when_session_changes() {
    let h = harness(MockBackend::new(), Arc::new(MemoryStore::new()));
    let scope = hydrated_scope(&h).await;
    let mut guard = RouteGuard::mount(&scope, Access::Role(Role::Talent)).unwrap();
    assert_eq!(guard.state(), &GuardState::Denied);

    h.session.login(&LoginForm::new("a@b.com", "Aa1!aaaa")).await;
    guard.evaluate(&h.session.snapshot());
    assert_eq!(guard.state(), &GuardState::Allowed);

    h.session.logout().await;
    guard.evaluate(&h.session.snapshot());
    assert_eq!(guard.state(), &GuardState::Denied);
}

#[tokio::test]
async fn settle_waits_for_hydration() {
    let h = stored(Role::Recruiter);
    let provider = SessionProvider::mount(h.session.clone());
    let mut guard = RouteGuard::mount(&provider.scope(), Access::Role(Role::Recruiter)).unwrap();
    let mut rx = h.session.subscribe();

    assert_eq!(guard.settle(&mut rx).await, &GuardState::Allowed);
}

#[tokio::test]
async fn next_change_follows_session_after_settling() {
    let h = harness(MockBackend::new(), Arc::new(MemoryStore::new()));
    let scope = hydrated_scope(&h).await;
    let mut rx = h.session.subscribe();
    let mut guard = RouteGuard::mount(&scope, Access::Role(Role::Talent)).unwrap();
    assert_eq!(guard.settle(&mut rx).await, &GuardState::Denied);

    h.session.login(&LoginForm::new("a@b.com", "Aa1!aaaa")).await;
    assert_eq!(guard.next_change(&mut rx).await, Some(GuardState::Allowed));

    h.session.logout().await;
    assert_eq!(guard.next_change(&mut rx).await, Some(GuardState::Denied));
    assert_eq!(h.history.redirects(), vec!["/login".to_owned(), "/login".to_owned(), "/login".to_owned()]);
}

#[tokio::test]
async fn next_change_ends_when_sender_is_dropped() {
    let h = harness(MockBackend::new(), Arc::new(MemoryStore::new()));
    let scope = hydrated_scope(&h).await;
    let mut guard = RouteGuard::mount(&scope, Access::Authenticated).unwrap();

    let (tx, mut rx) = watch::channel(h.session.snapshot());
    drop(tx);

    assert_eq!(guard.next_change(&mut rx).await, None);
}

#[test]
fn access_for_path_follows_role_sections() {
    assert_eq!(Access::for_path("/admin"), Access::Role(Role::Admin));
    assert_eq!(Access::for_path("/admin/users"), Access::Role(Role::Admin));
    assert_eq!(Access::for_path("/talent/dashboard"), Access::Role(Role::Talent));
    assert_eq!(Access::for_path("/recruiter/jobs/42"), Access::Role(Role::Recruiter));
    assert_eq!(Access::for_path("/administrator"), Access::Authenticated);
    assert_eq!(Access::for_path("/jobs"), Access::Authenticated);
    assert_eq!(Access::for_path("/"), Access::Authenticated);
}

#[tokio::test]
async fn talent_visiting_admin_path_is_denied() {
    let h = stored(Role::Talent);
    let scope = hydrated_scope(&h).await;

    let guard = RouteGuard::mount(&scope, Access::for_path("/admin/users")).unwrap();

    assert_eq!(guard.state(), &GuardState::Denied);
    assert_eq!(h.history.current().as_deref(), Some("/unauthorized"));
}
