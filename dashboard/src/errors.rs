//! Error types for the release board client

use thiserror::Error;

/// Main error type for the release board client
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// No response was received
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status
    #[error("Request failed with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    RequestError {
        status: u16,
        message: Option<String>,
    },

    /// The backend rejected the session token
    #[error("Session rejected by the backend")]
    Unauthorized,

    #[error("Unexpected response shape: {0}")]
    EnvelopeError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DashboardError {
    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError(_) | Self::Timeout(_))
    }

    /// Text shown to the user for this failure
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::RequestError {
                message: Some(message),
                ..
            } => message.clone(),
            Self::RequestError { message: None, .. } => fallback.to_string(),
            Self::TransportError(_) => {
                "Could not complete request, check your connection and retry".to_string()
            }
            Self::Timeout(_) => "The request timed out, please retry".to_string(),
            Self::Unauthorized => "Your session has expired, please log in again".to_string(),
            Self::ValidationError(message) | Self::NotFound(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DashboardError::Timeout(err.to_string())
        } else if err.is_decode() {
            DashboardError::EnvelopeError(err.to_string())
        } else {
            DashboardError::TransportError(err.to_string())
        }
    }
}
