//! Post-deployment review models

use api_models::models::record_id;
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;

/// Inclusive bound for review ratings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingScale {
    pub min: u8,
    pub max: u8,
}

impl RatingScale {
    pub fn new(min: u8, max: u8) -> Result<Self, DashboardError> {
        if min > max || max == 0 {
            return Err(DashboardError::ConfigError(format!(
                "Invalid rating scale {}..={}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, rating: u8) -> bool {
        (self.min..=self.max).contains(&rating)
    }

    /// Rating a fresh form starts from: the middle of the scale
    pub fn default_rating(&self) -> u8 {
        self.min + (self.max - self.min).div_ceil(2)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

/// A review as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(flatten, with = "record_id")]
    pub id: String,

    pub app_name: String,

    pub feedback: String,

    pub rating: u8,

    #[serde(default)]
    pub recommendations: Option<String>,
}

/// Working copy edited in the add/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub app_name: String,
    pub feedback: String,
    pub rating: u8,
    pub recommendations: String,
}

impl ReviewForm {
    pub fn new(scale: RatingScale) -> Self {
        Self {
            app_name: String::new(),
            feedback: String::new(),
            rating: scale.default_rating(),
            recommendations: String::new(),
        }
    }

    pub fn from_record(review: &Review) -> Self {
        Self {
            app_name: review.app_name.clone(),
            feedback: review.feedback.clone(),
            rating: review.rating,
            recommendations: review.recommendations.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self, scale: RatingScale) -> Result<ReviewPayload, DashboardError> {
        let app_name = self.app_name.trim();
        if app_name.is_empty() {
            return Err(DashboardError::ValidationError(
                "App name is required".to_string(),
            ));
        }

        let feedback = self.feedback.trim();
        if feedback.is_empty() {
            return Err(DashboardError::ValidationError(
                "Feedback is required".to_string(),
            ));
        }

        if !scale.contains(self.rating) {
            return Err(DashboardError::ValidationError(format!(
                "Rating must be between {} and {}",
                scale.min, scale.max
            )));
        }

        let recommendations = self.recommendations.trim();

        Ok(ReviewPayload {
            app_name: app_name.to_string(),
            feedback: feedback.to_string(),
            rating: self.rating,
            recommendations: (!recommendations.is_empty()).then(|| recommendations.to_string()),
        })
    }
}

/// Create/update request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub app_name: String,
    pub feedback: String,
    pub rating: u8,
    pub recommendations: Option<String>,
}
