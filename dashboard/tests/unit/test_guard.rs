//! Route guard tests against a live session

use std::sync::Arc;

use secrecy::SecretString;

use relboard::authn::session::Session;
use relboard::routes::guard::{GuardDecision, RouteGuard};
use relboard::routes::Route;
use relboard::storage::token_store::MemoryTokenStore;

use crate::support::{self, MockBackend};

#[tokio::test]
async fn test_guard_waits_for_restore() {
    let backend = MockBackend::start().await;
    let (client, _) = support::signed_in_client(&backend);
    let session = Session::new(client);

    assert_eq!(
        RouteGuard::decide(Route::Schedule, &session.state()),
        GuardDecision::Placeholder
    );

    let (_, decision) = tokio::join!(
        session.restore(),
        RouteGuard::resolve(Route::Schedule, &session)
    );
    assert_eq!(decision, GuardDecision::Render(Route::Schedule));
}

#[tokio::test]
async fn test_anonymous_redirected_until_login() {
    let backend = MockBackend::start().await;
    backend.add_user("Ada Lovelace", support::USERNAME, support::PASSWORD);
    let session = Session::new(support::client(&backend, Arc::new(MemoryTokenStore::new())));
    session.restore().await;

    for route in Route::navigation() {
        assert_eq!(
            RouteGuard::resolve(route, &session).await,
            GuardDecision::Redirect(Route::Login)
        );
    }
    assert_eq!(
        RouteGuard::resolve(Route::Login, &session).await,
        GuardDecision::Render(Route::Login)
    );

    let secret = SecretString::from(support::PASSWORD.to_string());
    assert!(session.login(support::USERNAME, &secret).await.success);
    assert_eq!(
        RouteGuard::resolve(Route::Reviews, &session).await,
        GuardDecision::Render(Route::Reviews)
    );

    session.logout().await;
    assert_eq!(
        RouteGuard::resolve(Route::Reviews, &session).await,
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_rejected_session_redirected() {
    let backend = MockBackend::start().await;
    let (client, _) = support::signed_in_client(&backend);
    let session = Session::new(client.clone());
    session.restore().await;

    backend.revoke_tokens();
    let _ = client.current_user().await;

    assert_eq!(
        RouteGuard::resolve(Route::Updates, &session).await,
        GuardDecision::Redirect(Route::Login)
    );
}
