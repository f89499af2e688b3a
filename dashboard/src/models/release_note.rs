//! Release note ("update") models

use chrono::NaiveDate;
use api_models::models::record_id;
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use crate::models::dates;

/// A release note as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNote {
    #[serde(flatten, with = "record_id")]
    pub id: String,

    pub app_name: String,

    pub features_added: String,

    #[serde(with = "dates")]
    pub start_date: NaiveDate,

    #[serde(with = "dates")]
    pub end_date: NaiveDate,
}

/// Working copy edited in the add/edit form; also the request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNoteForm {
    pub app_name: String,

    pub features_added: String,

    #[serde(with = "dates")]
    pub start_date: NaiveDate,

    #[serde(with = "dates")]
    pub end_date: NaiveDate,
}

impl ReleaseNoteForm {
    /// Blank form spanning a single day
    pub fn new(date: NaiveDate) -> Self {
        Self {
            app_name: String::new(),
            features_added: String::new(),
            start_date: date,
            end_date: date,
        }
    }

    pub fn from_record(note: &ReleaseNote) -> Self {
        Self {
            app_name: note.app_name.clone(),
            features_added: note.features_added.clone(),
            start_date: note.start_date,
            end_date: note.end_date,
        }
    }

    pub fn validate(&self, allow_inverted_dates: bool) -> Result<ReleaseNoteForm, DashboardError> {
        let app_name = self.app_name.trim();
        if app_name.is_empty() {
            return Err(DashboardError::ValidationError(
                "App name is required".to_string(),
            ));
        }

        let features_added = self.features_added.trim();
        if features_added.is_empty() {
            return Err(DashboardError::ValidationError(
                "Features added is required".to_string(),
            ));
        }

        if !allow_inverted_dates && self.end_date < self.start_date {
            return Err(DashboardError::ValidationError(format!(
                "End date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }

        Ok(Self {
            app_name: app_name.to_string(),
            features_added: features_added.to_string(),
            ..self.clone()
        })
    }
}
