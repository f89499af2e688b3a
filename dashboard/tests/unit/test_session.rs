//! Session store unit tests

use std::sync::Arc;

use axum::http::Method;
use secrecy::SecretString;

use relboard::authn::session::{Session, SessionState};
use relboard::authn::token::SessionToken;
use relboard::controller::schedules::Schedules;
use relboard::errors::DashboardError;
use relboard::storage::token_store::{MemoryTokenStore, TokenStore};

use crate::support::{self, MockBackend};

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

async fn anonymous_session(backend: &MockBackend) -> (Session, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    let session = Session::new(support::client(backend, tokens.clone()));
    assert_eq!(session.restore().await, SessionState::Anonymous);
    (session, tokens)
}

#[tokio::test]
async fn test_initial_state_is_loading() {
    let backend = MockBackend::start().await;
    let session = Session::new(support::client(&backend, Arc::new(MemoryTokenStore::new())));
    assert!(session.is_loading());
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn test_restore_without_token_skips_backend() {
    let backend = MockBackend::start().await;
    let (session, _) = anonymous_session(&backend).await;

    assert!(!session.is_loading());
    assert!(backend.requests_to(Method::GET, "/auth/me").is_empty());
}

#[tokio::test]
async fn test_restore_with_valid_token() {
    let backend = MockBackend::start().await;
    let (client, _) = support::signed_in_client(&backend);
    let session = Session::new(client);

    let state = session.restore().await;
    assert!(state.is_authenticated());
    assert_eq!(session.user().unwrap().username, support::USERNAME);
    assert_eq!(session.user().unwrap().display_name(), "Ada Lovelace");
    assert!(session.user().unwrap().id.is_some());
}

#[tokio::test]
async fn test_restore_with_stale_token() {
    let backend = MockBackend::start().await;
    let tokens = Arc::new(MemoryTokenStore::with_token(SessionToken::new("stale")));
    let session = Session::new(support::client(&backend, tokens.clone()));

    assert_eq!(session.restore().await, SessionState::Anonymous);
    assert_eq!(backend.requests_to(Method::GET, "/auth/me").len(), 1);
    assert!(tokens.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_success_persists_token() {
    let backend = MockBackend::start().await;
    backend.add_user("Ada Lovelace", support::USERNAME, support::PASSWORD);
    let (session, tokens) = anonymous_session(&backend).await;

    let outcome = session.login(support::USERNAME, &secret(support::PASSWORD)).await;
    assert!(outcome.success);
    assert!(outcome.message.is_none());
    assert!(session.is_authenticated());

    let token = tokens.load().await.unwrap().unwrap();
    assert!(backend.is_token_live(token.expose()));

    let login = &backend.requests_to(Method::POST, "/auth/login")[0];
    assert!(login.bearer.is_none());
    assert_eq!(login.body.as_ref().unwrap()["username"], "ada");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let backend = MockBackend::start().await;
    backend.add_user("Ada Lovelace", support::USERNAME, support::PASSWORD);
    let (session, tokens) = anonymous_session(&backend).await;

    let outcome = session.login(support::USERNAME, &secret("wrong")).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(tokens.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_blank_fields_not_sent() {
    let backend = MockBackend::start().await;
    let (session, _) = anonymous_session(&backend).await;

    let outcome = session.login("  ", &secret("")).await;
    assert!(!outcome.success);
    assert!(!outcome.message.unwrap().is_empty());
    assert!(backend.requests_to(Method::POST, "/auth/login").is_empty());
}

#[tokio::test]
async fn test_register() {
    let backend = MockBackend::start().await;
    backend.add_user("Ada Lovelace", support::USERNAME, support::PASSWORD);
    let (session, _) = anonymous_session(&backend).await;

    let outcome = session
        .register("Someone Else", support::USERNAME, &secret("pw"))
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("User already exists"));
    assert!(!session.is_authenticated());

    let outcome = session.register("Grace Hopper", "grace", &secret("cobol")).await;
    assert!(outcome.success);
    assert_eq!(session.user().unwrap().display_name(), "Grace Hopper");

    let body = backend.requests_to(Method::POST, "/auth/register")[1]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["fullName"], "Grace Hopper");
    assert_eq!(body["username"], "grace");
}

#[tokio::test]
async fn test_logout_is_local_first() {
    let backend = MockBackend::start().await;
    let (client, tokens) = support::signed_in_client(&backend);
    let token = tokens.load().await.unwrap().unwrap();
    let session = Session::new(client);
    session.restore().await;

    let handle = session.logout().await.expect("a backend logout call");
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(tokens.load().await.unwrap().is_none());

    handle.await.unwrap();
    let logout = &backend.requests_to(Method::GET, "/auth/logout")[0];
    assert_eq!(logout.bearer.as_deref(), Some(token.expose()));
    assert!(!backend.is_token_live(token.expose()));
}

#[tokio::test]
async fn test_logout_backend_failure_ignored() {
    let backend = MockBackend::start().await;
    backend.set_fail_logout(true);
    let (client, tokens) = support::signed_in_client(&backend);
    let session = Session::new(client);
    session.restore().await;

    if let Some(handle) = session.logout().await {
        handle.await.unwrap();
    }
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(tokens.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_without_session() {
    let backend = MockBackend::start().await;
    let (session, _) = anonymous_session(&backend).await;

    assert!(session.logout().await.is_none());
    assert!(backend.requests_to(Method::GET, "/auth/logout").is_empty());
}

#[tokio::test]
async fn test_rejection_forces_anonymous() {
    let backend = MockBackend::start().await;
    let (client, tokens) = support::signed_in_client(&backend);
    let session = Session::new(client.clone());
    assert!(session.restore().await.is_authenticated());

    backend.revoke_tokens();
    let err = client.list::<Schedules>().await.unwrap_err();
    assert!(matches!(err, DashboardError::Unauthorized));

    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(tokens.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejection_before_login_ignored() {
    let backend = MockBackend::start().await;
    backend.add_user("Ada Lovelace", support::USERNAME, support::PASSWORD);
    let tokens = Arc::new(MemoryTokenStore::with_token(SessionToken::new("expired")));
    let client = support::client(&backend, tokens.clone());
    let session = Session::new(client.clone());

    // rejected before the session resolves
    assert!(client.list::<Schedules>().await.is_err());

    let outcome = session.login(support::USERNAME, &secret(support::PASSWORD)).await;
    assert!(outcome.success);
    assert!(session.is_authenticated());
    assert!(client.list::<Schedules>().await.is_ok());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_wait_resolved() {
    let backend = MockBackend::start().await;
    let (client, _) = support::signed_in_client(&backend);
    let session = Arc::new(Session::new(client));

    let waiter = {
        let session = session.clone();
        tokio::spawn(async move { session.wait_resolved().await })
    };
    session.restore().await;

    let state = waiter.await.unwrap();
    assert!(state.is_authenticated());
}
