//! Release notes ("updates") page

use crate::controller::list::ResourceList;
use crate::controller::resource::{FormRules, Resource, UpdateMethod};
use crate::errors::DashboardError;
use crate::models::release_note::{ReleaseNote, ReleaseNoteForm};

/// The `/updates` collection
pub struct ReleaseNotes;

impl Resource for ReleaseNotes {
    type Record = ReleaseNote;
    type Form = ReleaseNoteForm;
    type Payload = ReleaseNoteForm;

    const COLLECTION: &'static str = "/updates";
    const SINGULAR: &'static str = "update";
    const PLURAL: &'static str = "updates";
    const TITLE: &'static str = "Update";
    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Put;

    fn id(record: &ReleaseNote) -> &str {
        &record.id
    }

    fn new_form(_rules: &FormRules) -> ReleaseNoteForm {
        ReleaseNoteForm::new(FormRules::today())
    }

    fn form_from(record: &ReleaseNote) -> ReleaseNoteForm {
        ReleaseNoteForm::from_record(record)
    }

    fn validate(form: &ReleaseNoteForm, rules: &FormRules) -> Result<ReleaseNoteForm, DashboardError> {
        form.validate(rules.allow_inverted_dates)
    }
}

pub type ReleaseNoteList = ResourceList<ReleaseNotes>;
