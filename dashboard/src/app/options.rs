//! Application configuration options

use crate::controller::resource::FormRules;
use crate::errors::DashboardError;
use crate::http::client::ClientOptions;
use crate::logs::{LogOptions, LogTarget};
use crate::models::review::RatingScale;
use crate::shell::args::CliArgs;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Storage layout paths
    pub layout: StorageLayout,

    /// Backend connection
    pub client: ClientOptions,

    pub logging: LogOptions,

    /// Form validation rules shared by the list pages
    pub form_rules: FormRules,

    /// Maximum number of undisplayed notices
    pub toast_capacity: usize,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            layout: StorageLayout::default(),
            client: ClientOptions::default(),
            logging: LogOptions::default(),
            form_rules: FormRules::default(),
            toast_capacity: 32,
        }
    }
}

impl AppOptions {
    pub fn from_settings(layout: StorageLayout, settings: &Settings) -> Result<Self, DashboardError> {
        let target = if settings.log_to_file {
            LogTarget::File(layout.log_file())
        } else {
            LogTarget::Stderr
        };

        Ok(Self {
            client: ClientOptions {
                base_url: settings.backend.base_url.clone(),
                timeout: settings.backend.request_timeout(),
            },
            logging: LogOptions {
                log_level: settings.log_level.clone(),
                target,
                json_format: settings.json_logs,
            },
            form_rules: FormRules {
                rating_scale: RatingScale::new(
                    settings.reviews.rating_min,
                    settings.reviews.rating_max,
                )?,
                allow_inverted_dates: settings.updates.allow_inverted_dates,
            },
            layout,
            ..Default::default()
        })
    }

    /// Command line flags win over the settings file
    pub fn apply_overrides(&mut self, args: &CliArgs) -> Result<(), DashboardError> {
        if let Some(base_url) = args.flag("base-url") {
            self.client.base_url = base_url.to_string();
        }
        if let Some(level) = args.flag("log-level") {
            self.logging.log_level = level.parse().map_err(DashboardError::ConfigError)?;
        }
        if args.has("json-logs") {
            self.logging.json_format = true;
        }
        Ok(())
    }
}
