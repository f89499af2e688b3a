//! Resource collection API client

use crate::controller::resource::{Resource, UpdateMethod};
use crate::errors::DashboardError;
use crate::http::client::{member_path, HttpClient};
use crate::models::schedule::{NotificationRecord, Schedule, StatusChange};

impl HttpClient {
    /// Fetch a whole collection, in backend order
    pub async fn list<R: Resource>(&self) -> Result<Vec<R::Record>, DashboardError> {
        self.get(R::COLLECTION).await
    }

    /// Create a record; the backend may echo it back
    pub async fn create<R: Resource>(
        &self,
        payload: &R::Payload,
    ) -> Result<Option<R::Record>, DashboardError> {
        self.post(R::COLLECTION, payload).await
    }

    /// Replace the editable fields of a record
    pub async fn update<R: Resource>(
        &self,
        id: &str,
        payload: &R::Payload,
    ) -> Result<Option<R::Record>, DashboardError> {
        let path = member_path(R::COLLECTION, id)?;
        match R::UPDATE_METHOD {
            UpdateMethod::Patch => self.patch(&path, payload).await,
            UpdateMethod::Put => self.put(&path, payload).await,
        }
    }

    /// Delete a record
    pub async fn remove<R: Resource>(&self, id: &str) -> Result<(), DashboardError> {
        let path = member_path(R::COLLECTION, id)?;
        let _: Option<serde_json::Value> = self.delete(&path).await?;
        Ok(())
    }

    /// Change a schedule's status. The backend notifies the assigned
    /// developers as a side effect.
    pub async fn change_schedule_status(
        &self,
        id: &str,
        change: &StatusChange,
    ) -> Result<Option<Schedule>, DashboardError> {
        let path = member_path("/schedules", id)?;
        self.patch(&path, change).await
    }

    /// Trigger (or re-trigger) the developer notification for a schedule
    pub async fn notify_schedule(&self, id: &str) -> Result<Option<NotificationRecord>, DashboardError> {
        let path = format!("{}/notify", member_path("/schedules", id)?);
        self.post(&path, &serde_json::json!({})).await
    }
}
