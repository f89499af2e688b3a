//! HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use api_models::models::{Envelope, ErrorResponse};
use http::{Method, StatusCode};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, error, warn};
use url::Url;

use crate::authn::token::SessionToken;
use crate::errors::DashboardError;
use crate::storage::token_store::TokenStore;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// HTTP client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Backend root, e.g. `http://localhost:5000/api`
    pub base_url: String,

    /// Upper bound for a single request
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for backend communication.
///
/// The bearer token is read from the token store when each request is
/// dispatched, never cached, so a login finished elsewhere is honored by the
/// very next request.
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    rejections: watch::Sender<u64>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(options: &ClientOptions, tokens: Arc<dyn TokenStore>) -> Result<Self, DashboardError> {
        let parsed = Url::parse(&options.base_url).map_err(|e| {
            DashboardError::ConfigError(format!("Invalid backend URL {}: {}", options.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DashboardError::ConfigError(format!(
                "Unsupported backend URL scheme: {}",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| DashboardError::ConfigError(e.to_string()))?;

        let (rejections, _) = watch::channel(0);

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            tokens,
            rejections,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Counter bumped every time the backend rejects the current stored token
    pub fn rejections(&self) -> watch::Receiver<u64> {
        self.rejections.subscribe()
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let token = self.tokens.load().await?;
        self.dispatch(Method::GET, path, None::<&()>, token).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DashboardError> {
        let token = self.tokens.load().await?;
        self.dispatch(Method::POST, path, Some(body), token).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DashboardError> {
        let token = self.tokens.load().await?;
        self.dispatch(Method::PUT, path, Some(body), token).await
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DashboardError> {
        let token = self.tokens.load().await?;
        self.dispatch(Method::PATCH, path, Some(body), token).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let token = self.tokens.load().await?;
        self.dispatch(Method::DELETE, path, None::<&()>, token).await
    }

    /// Send a request and unwrap the `{ data }` envelope of the response.
    ///
    /// `token` is attached as a bearer credential when present.
    pub(crate) async fn dispatch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<SessionToken>,
    ) -> Result<T, DashboardError> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(request_id = %request_id, "{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = &token {
            request = request.bearer_auth(token.expose());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(request_id = %request_id, "HTTP {} {} failed: {}", method, url, e);
            DashboardError::from(e)
        })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Some(token) = token {
                warn!(request_id = %request_id, "HTTP {} {} rejected the session token", method, url);
                self.reject(&token).await;
                return Err(DashboardError::Unauthorized);
            }
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(request_id = %request_id, "HTTP {} {} failed: {} - {}", method, url, status, body);
            return Err(DashboardError::RequestError {
                status: status.as_u16(),
                message: ErrorResponse::message_from_body(&body),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(request_id = %request_id, "HTTP {} {} body read failed: {}", method, url, e);
            DashboardError::from(e)
        })?;

        // `success` is checked before `data` is typed: a refusal usually has no data
        let envelope: Envelope<Option<Value>> = serde_json::from_slice(&bytes).map_err(|e| {
            error!(request_id = %request_id, "HTTP {} {} returned an unexpected body: {}", method, url, e);
            DashboardError::EnvelopeError(format!("{} {}: {}", method, path, e))
        })?;

        if envelope.is_refused() {
            error!(request_id = %request_id, "HTTP {} {} refused by backend", method, url);
            return Err(DashboardError::RequestError {
                status: status.as_u16(),
                message: envelope.message,
            });
        }

        serde_json::from_value(envelope.data.unwrap_or(Value::Null)).map_err(|e| {
            error!(request_id = %request_id, "HTTP {} {} returned unexpected data: {}", method, url, e);
            DashboardError::EnvelopeError(format!("{} {}: {}", method, path, e))
        })
    }

    /// Forget a token the backend no longer accepts
    async fn reject(&self, token: &SessionToken) {
        match self.tokens.clear_if(token).await {
            Ok(true) => {
                debug!("Cleared rejected session token");
                self.rejections.send_modify(|count| *count += 1);
            }
            // a newer session already replaced it, or logout got there first
            Ok(false) => debug!("Rejected token is no longer current"),
            Err(e) => error!("Failed to clear rejected session token: {}", e),
        }
    }
}

/// Path of a single member of a collection
pub(crate) fn member_path(collection: &str, id: &str) -> Result<String, DashboardError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#', ' ']) {
        return Err(DashboardError::ValidationError(format!("Invalid id: {:?}", id)));
    }
    Ok(format!("{}/{}", collection, id))
}
