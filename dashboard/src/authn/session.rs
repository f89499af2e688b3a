//! Session store: who is logged in.
//!
//! State machine: `Unknown` (initial, loading) resolves once to `Anonymous`
//! or `Authenticated`; login/register move `Anonymous -> Authenticated`;
//! logout and backend credential rejection move back to `Anonymous`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use api_models::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::authn::token::SessionToken;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state while the persisted token is being checked
    Unknown,
    Anonymous,
    Authenticated(UserProfile),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Unknown)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Result of a login or registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl AuthOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Session store, created once per client and handed to whatever owns the
/// shell. Cheap to share behind an `Arc`.
pub struct Session {
    http: Arc<HttpClient>,
    state: watch::Sender<SessionState>,
    rejections: watch::Receiver<u64>,
    seen_rejections: AtomicU64,
}

impl Session {
    pub fn new(http: Arc<HttpClient>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        let rejections = http.rejections();
        let seen = *rejections.borrow();

        Self {
            http,
            state,
            rejections,
            seen_rejections: AtomicU64::new(seen),
        }
    }

    /// Resolve the initial state from the persisted token: a single
    /// session check, any failure counts as "no session".
    pub async fn restore(&self) -> SessionState {
        self.state.send_replace(SessionState::Unknown);

        let resolved = match self.http.token_store().load().await {
            Ok(Some(_)) => match self.http.current_user().await {
                Ok(user) => {
                    info!("Restored session for {}", user.display_name());
                    SessionState::Authenticated(user)
                }
                Err(e) => {
                    warn!("Session check failed: {}", e);
                    SessionState::Anonymous
                }
            },
            Ok(None) => {
                debug!("No persisted session token");
                SessionState::Anonymous
            }
            Err(e) => {
                error!("Unable to read the session token: {}", e);
                SessionState::Anonymous
            }
        };

        self.mark_rejections_seen();
        self.state.send_replace(resolved.clone());
        resolved
    }

    pub async fn login(&self, identifier: &str, secret: &SecretString) -> AuthOutcome {
        if identifier.trim().is_empty() || secret.expose_secret().is_empty() {
            return AuthOutcome::failed("Username and password are required");
        }

        let request = LoginRequest {
            username: identifier.trim().to_string(),
            password: secret.expose_secret().to_string(),
        };

        match self.http.login(&request).await {
            Ok(response) => self.start(response).await,
            Err(e) => {
                error!("Login error: {}", e);
                AuthOutcome::failed(e.user_message("Login failed"))
            }
        }
    }

    pub async fn register(
        &self,
        display_name: &str,
        identifier: &str,
        secret: &SecretString,
    ) -> AuthOutcome {
        if display_name.trim().is_empty()
            || identifier.trim().is_empty()
            || secret.expose_secret().is_empty()
        {
            return AuthOutcome::failed("All fields are required");
        }

        let request = RegisterRequest {
            full_name: display_name.trim().to_string(),
            username: identifier.trim().to_string(),
            password: secret.expose_secret().to_string(),
        };

        match self.http.register(&request).await {
            Ok(response) => self.start(response).await,
            Err(e) => {
                error!("Register error: {}", e);
                AuthOutcome::failed(e.user_message("Registration failed"))
            }
        }
    }

    /// Forget the session locally, whatever the backend says. The backend
    /// is told in the background; the handle is returned for callers that
    /// are about to exit and want to give it a chance to go out.
    pub async fn logout(&self) -> Option<JoinHandle<()>> {
        let tokens = self.http.token_store();
        let token = tokens.load().await.unwrap_or_else(|e| {
            warn!("Unable to read the session token during logout: {}", e);
            None
        });

        if let Err(e) = tokens.clear().await {
            error!("Failed to clear the session token: {}", e);
        }
        self.mark_rejections_seen();
        self.state.send_replace(SessionState::Anonymous);
        info!("Logged out");

        let token = token?;
        let http = self.http.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = http.logout_with(token).await {
                warn!("Backend logout failed: {}", e);
            }
        }))
    }

    /// Current state. A credential rejection seen on any request since the
    /// last transition forces `Anonymous` here.
    pub fn state(&self) -> SessionState {
        let latest = *self.rejections.borrow();
        let previous = self.seen_rejections.fetch_max(latest, Ordering::SeqCst);
        if latest > previous {
            let forced = self.state.send_if_modified(|state| {
                if state.is_authenticated() {
                    *state = SessionState::Anonymous;
                    true
                } else {
                    false
                }
            });
            if forced {
                warn!("Session token rejected by the backend, logged out");
            }
        }
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until the initial resolution is over
    pub async fn wait_resolved(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        if let Err(e) = rx.wait_for(|state| !state.is_loading()).await {
            debug!("Session state channel closed: {}", e);
        }
        self.state()
    }

    async fn start(&self, response: AuthResponse) -> AuthOutcome {
        let token = SessionToken::new(response.token);
        if token.is_blank() {
            error!("Backend returned an empty session token");
            return AuthOutcome::failed(
                DashboardError::EnvelopeError("empty token".to_string())
                    .user_message("Login failed"),
            );
        }

        if let Err(e) = self.http.token_store().save(&token).await {
            error!("Failed to persist the session token: {}", e);
            return AuthOutcome::failed("Could not save the session locally");
        }

        info!("Logged in as {}", response.user.display_name());
        self.mark_rejections_seen();
        self.state
            .send_replace(SessionState::Authenticated(response.user));
        AuthOutcome::succeeded()
    }

    fn mark_rejections_seen(&self) {
        let latest = *self.rejections.borrow();
        self.seen_rejections.fetch_max(latest, Ordering::SeqCst);
    }
}
