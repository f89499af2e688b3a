//! Authentication API client

use api_models::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use http::Method;

use crate::authn::token::SessionToken;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Profile of the session the stored token belongs to
    pub async fn current_user(&self) -> Result<UserProfile, DashboardError> {
        self.get("/auth/me").await
    }

    /// Exchange credentials for a token. Never sends the stored token.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, DashboardError> {
        self.dispatch(Method::POST, "/auth/login", Some(request), None)
            .await
    }

    /// Create an account and start a session with it
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, DashboardError> {
        self.dispatch(Method::POST, "/auth/register", Some(request), None)
            .await
    }

    /// Tell the backend `token` is done with. The token is passed explicitly
    /// because the caller has usually forgotten it locally already.
    pub async fn logout_with(&self, token: SessionToken) -> Result<(), DashboardError> {
        let _: Option<serde_json::Value> = self
            .dispatch(Method::GET, "/auth/logout", None::<&()>, Some(token))
            .await?;
        Ok(())
    }
}
