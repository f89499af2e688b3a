//! Shared test fixtures

pub mod mock_backend;

use std::sync::Arc;
use std::time::Duration;

use relboard::app::options::AppOptions;
use relboard::app::state::AppState;
use relboard::authn::token::SessionToken;
use relboard::controller::notices::ToastQueue;
use relboard::controller::resource::FormRules;
use relboard::http::client::{ClientOptions, HttpClient};
use relboard::storage::token_store::{MemoryTokenStore, TokenStore};

pub use mock_backend::MockBackend;

pub const USERNAME: &str = "ada";
pub const PASSWORD: &str = "hunter2";

pub fn client_options(backend: &MockBackend) -> ClientOptions {
    ClientOptions {
        base_url: backend.base_url.clone(),
        timeout: Duration::from_secs(5),
    }
}

/// Client sharing `tokens` with the caller
pub fn client(backend: &MockBackend, tokens: Arc<MemoryTokenStore>) -> Arc<HttpClient> {
    Arc::new(HttpClient::new(&client_options(backend), tokens).unwrap())
}

/// Client already holding a token the backend accepts
pub fn signed_in_client(backend: &MockBackend) -> (Arc<HttpClient>, Arc<MemoryTokenStore>) {
    backend.add_user("Ada Lovelace", USERNAME, PASSWORD);
    let token = backend.issue_token(USERNAME);
    let tokens = Arc::new(MemoryTokenStore::with_token(SessionToken::new(token)));
    (client(backend, tokens.clone()), tokens)
}

pub fn toasts() -> Arc<ToastQueue> {
    Arc::new(ToastQueue::new(32))
}

/// Full application state against the mock backend
pub fn app_state(backend: &MockBackend, rules: FormRules) -> (AppState, Arc<MemoryTokenStore>) {
    let options = AppOptions {
        client: client_options(backend),
        form_rules: rules,
        ..Default::default()
    };
    let tokens = Arc::new(MemoryTokenStore::new());
    let store: Arc<dyn TokenStore> = tokens.clone();
    (AppState::with_token_store(&options, store).unwrap(), tokens)
}

/// Messages posted so far, oldest first
pub fn messages(toasts: &ToastQueue) -> Vec<String> {
    toasts.drain().into_iter().map(|n| n.message).collect()
}
