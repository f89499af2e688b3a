//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::authn::session::Session;
use crate::controller::notices::{Notifier, ToastQueue};
use crate::controller::release_notes::ReleaseNoteList;
use crate::controller::reviews::ReviewList;
use crate::controller::schedules::ScheduleList;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;
use crate::storage::token_store::{FileTokenStore, TokenStore};

/// Main application state
pub struct AppState {
    /// HTTP client for backend communication
    pub http_client: Arc<HttpClient>,

    pub session: Arc<Session>,

    pub schedules: ScheduleList,
    pub updates: ReleaseNoteList,
    pub reviews: ReviewList,

    /// Notices waiting to be shown
    pub toasts: Arc<ToastQueue>,
}

impl AppState {
    /// Initialize application state with the session persisted on disk
    pub fn init(options: &AppOptions) -> Result<Self, DashboardError> {
        let tokens = Arc::new(FileTokenStore::new(options.layout.session_file()));
        Self::with_token_store(options, tokens)
    }

    pub fn with_token_store(
        options: &AppOptions,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, DashboardError> {
        info!("Initializing application state...");

        let http_client = Arc::new(HttpClient::new(&options.client, tokens)?);
        let session = Arc::new(Session::new(http_client.clone()));

        let toasts = Arc::new(ToastQueue::new(options.toast_capacity));
        let notifier: Arc<dyn Notifier> = toasts.clone();
        let rules = options.form_rules;

        Ok(Self {
            schedules: ScheduleList::new(http_client.clone(), notifier.clone(), rules),
            updates: ReleaseNoteList::new(http_client.clone(), notifier.clone(), rules),
            reviews: ReviewList::new(http_client.clone(), notifier, rules),
            http_client,
            session,
            toasts,
        })
    }

    /// End every page view. Responses still in flight are dropped.
    pub fn shutdown(&self) {
        info!("Shutting down application state...");
        self.schedules.detach();
        self.updates.detach();
        self.reviews.detach();
    }
}
