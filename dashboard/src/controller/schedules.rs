//! Deployment schedules page

use crate::controller::list::ResourceList;
use crate::controller::resource::{FormRules, Resource, UpdateMethod};
use crate::errors::DashboardError;
use crate::models::schedule::{
    NotificationRecord, Schedule, ScheduleForm, SchedulePayload, ScheduleStatus, StatusChange,
};

/// The `/schedules` collection
pub struct Schedules;

impl Resource for Schedules {
    type Record = Schedule;
    type Form = ScheduleForm;
    type Payload = SchedulePayload;

    const COLLECTION: &'static str = "/schedules";
    const SINGULAR: &'static str = "schedule";
    const PLURAL: &'static str = "schedules";
    const TITLE: &'static str = "Schedule";
    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;

    fn id(record: &Schedule) -> &str {
        &record.id
    }

    fn new_form(_rules: &FormRules) -> ScheduleForm {
        ScheduleForm::new(FormRules::today())
    }

    fn form_from(record: &Schedule) -> ScheduleForm {
        ScheduleForm::from_record(record)
    }

    fn validate(form: &ScheduleForm, _rules: &FormRules) -> Result<SchedulePayload, DashboardError> {
        form.validate()
    }
}

pub type ScheduleList = ResourceList<Schedules>;

impl ResourceList<Schedules> {
    /// Move a schedule to `status`. Uses the narrow status call rather than
    /// a full edit because the backend notifies developers on it. `Failed`
    /// without a reason is refused before anything is sent.
    pub async fn change_status(
        &self,
        id: &str,
        status: ScheduleStatus,
        failure_reason: Option<&str>,
    ) -> Result<(), DashboardError> {
        let change = match StatusChange::new(status, failure_reason) {
            Ok(change) => change,
            Err(e) => {
                self.fail(&e, "Error updating status");
                return Err(e);
            }
        };

        let view = self.view_epoch();
        if let Err(e) = self.http().change_schedule_status(id, &change).await {
            self.fail(&e, "Error updating status");
            return Err(e);
        }

        self.notifier()
            .success(format!("Status changed to {}", status));

        if self.view_epoch() == view {
            let _ = self.refresh().await;
        }
        Ok(())
    }

    /// Send the developer notification for a schedule again. Leaves every
    /// field of the record as it is.
    pub async fn resend_notification(
        &self,
        id: &str,
    ) -> Result<Option<NotificationRecord>, DashboardError> {
        match self.http().notify_schedule(id).await {
            Ok(record) => {
                let message = match &record {
                    Some(r) if !r.recipients.is_empty() => {
                        format!("Notification sent to {} developer(s)", r.recipients.len())
                    }
                    _ => "Notification sent".to_string(),
                };
                self.notifier().success(message);
                Ok(record)
            }
            Err(e) => {
                self.fail(&e, "Error sending notification");
                Err(e)
            }
        }
    }
}
