//! Deployment schedule models

use std::fmt;
use std::str::FromStr;

use api_models::models::record_id;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use crate::models::dates;
use crate::models::time_slot::TimeSlot;

/// Deployment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Failed,
}

impl ScheduleStatus {
    pub const ALL: [ScheduleStatus; 4] = [
        ScheduleStatus::Scheduled,
        ScheduleStatus::InProgress,
        ScheduleStatus::Completed,
        ScheduleStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "Scheduled",
            ScheduleStatus::InProgress => "In Progress",
            ScheduleStatus::Completed => "Completed",
            ScheduleStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "scheduled" => Ok(ScheduleStatus::Scheduled),
            "inprogress" => Ok(ScheduleStatus::InProgress),
            "completed" => Ok(ScheduleStatus::Completed),
            "failed" => Ok(ScheduleStatus::Failed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Who was notified about a schedule, and when
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(default)]
    pub sent: bool,

    #[serde(default)]
    pub recipients: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// A planned deployment as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(flatten, with = "record_id")]
    pub id: String,

    pub app_name: String,

    #[serde(with = "dates")]
    pub deployment_date: NaiveDate,

    pub time_slot: TimeSlot,

    pub status: ScheduleStatus,

    #[serde(default)]
    pub notes: Option<String>,

    /// Present only while `status` is `Failed`
    #[serde(default)]
    pub failure_reason: Option<String>,

    /// Assigned developers (email addresses)
    #[serde(default)]
    pub developers: Vec<String>,

    #[serde(default)]
    pub notification: Option<NotificationRecord>,
}

/// Working copy edited in the add/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleForm {
    pub app_name: String,
    pub deployment_date: NaiveDate,
    pub time_slot: Option<TimeSlot>,
    pub status: ScheduleStatus,
    pub notes: String,
    pub failure_reason: String,
    pub developers: Vec<String>,
}

impl ScheduleForm {
    /// Blank form for a deployment on `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            app_name: String::new(),
            deployment_date: date,
            time_slot: None,
            status: ScheduleStatus::Scheduled,
            notes: String::new(),
            failure_reason: String::new(),
            developers: Vec::new(),
        }
    }

    pub fn from_record(schedule: &Schedule) -> Self {
        Self {
            app_name: schedule.app_name.clone(),
            deployment_date: schedule.deployment_date,
            time_slot: Some(schedule.time_slot),
            status: schedule.status,
            notes: schedule.notes.clone().unwrap_or_default(),
            failure_reason: schedule.failure_reason.clone().unwrap_or_default(),
            developers: schedule.developers.clone(),
        }
    }

    /// Check required fields and build the request body
    pub fn validate(&self) -> Result<SchedulePayload, DashboardError> {
        let app_name = self.app_name.trim();
        if app_name.is_empty() {
            return Err(DashboardError::ValidationError(
                "App name is required".to_string(),
            ));
        }

        let time_slot = self.time_slot.ok_or_else(|| {
            DashboardError::ValidationError("Time slot is required".to_string())
        })?;

        let failure_reason = failure_reason_for(self.status, &self.failure_reason)?;

        let mut developers: Vec<String> = Vec::new();
        for developer in self.developers.iter().map(|d| d.trim()) {
            if !developer.is_empty() && !developers.iter().any(|d| d == developer) {
                developers.push(developer.to_string());
            }
        }

        let notes = self.notes.trim();

        Ok(SchedulePayload {
            app_name: app_name.to_string(),
            deployment_date: self.deployment_date,
            time_slot,
            status: self.status,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            failure_reason,
            developers,
        })
    }
}

/// Create/update request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub app_name: String,

    #[serde(with = "dates")]
    pub deployment_date: NaiveDate,

    pub time_slot: TimeSlot,

    pub status: ScheduleStatus,

    pub notes: Option<String>,

    /// Serialized as `null` for any status but `Failed` so the backend drops it
    pub failure_reason: Option<String>,

    pub developers: Vec<String>,
}

/// Narrow body for a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: ScheduleStatus,
    pub failure_reason: Option<String>,
}

impl StatusChange {
    pub fn new(status: ScheduleStatus, failure_reason: Option<&str>) -> Result<Self, DashboardError> {
        Ok(Self {
            status,
            failure_reason: failure_reason_for(status, failure_reason.unwrap_or_default())?,
        })
    }
}

/// A failure reason is required for `Failed` and dropped for every other status
fn failure_reason_for(
    status: ScheduleStatus,
    reason: &str,
) -> Result<Option<String>, DashboardError> {
    let reason = reason.trim();
    match status {
        ScheduleStatus::Failed if reason.is_empty() => Err(DashboardError::ValidationError(
            "A failure reason is required when status is Failed".to_string(),
        )),
        ScheduleStatus::Failed => Ok(Some(reason.to_string())),
        _ => Ok(None),
    }
}
