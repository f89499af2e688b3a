//! Settings file management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logs::LogLevel;

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Write logs to `<root>/logs/relboard.log` instead of stderr
    #[serde(default)]
    pub log_to_file: bool,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Review form rules
    #[serde(default)]
    pub reviews: ReviewSettings,

    /// Release note form rules
    #[serde(default)]
    pub updates: UpdateSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_to_file: false,
            json_logs: false,
            backend: BackendSettings::default(),
            reviews: ReviewSettings::default(),
            updates: UpdateSettings::default(),
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Upper bound for a single request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Review settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSettings {
    #[serde(default = "default_rating_min")]
    pub rating_min: u8,

    #[serde(default = "default_rating_max")]
    pub rating_max: u8,
}

fn default_rating_min() -> u8 {
    1
}

fn default_rating_max() -> u8 {
    5
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            rating_min: default_rating_min(),
            rating_max: default_rating_max(),
        }
    }
}

/// Release note settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettings {
    /// Accept an end date earlier than the start date
    #[serde(default)]
    pub allow_inverted_dates: bool,
}
