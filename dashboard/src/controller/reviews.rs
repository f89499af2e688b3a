//! Reviews page

use crate::controller::list::ResourceList;
use crate::controller::resource::{FormRules, Resource, UpdateMethod};
use crate::errors::DashboardError;
use crate::models::review::{Review, ReviewForm, ReviewPayload};

/// The `/reviews` collection
pub struct Reviews;

impl Resource for Reviews {
    type Record = Review;
    type Form = ReviewForm;
    type Payload = ReviewPayload;

    const COLLECTION: &'static str = "/reviews";
    const SINGULAR: &'static str = "review";
    const PLURAL: &'static str = "reviews";
    const TITLE: &'static str = "Review";
    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;

    fn id(record: &Review) -> &str {
        &record.id
    }

    fn new_form(rules: &FormRules) -> ReviewForm {
        ReviewForm::new(rules.rating_scale)
    }

    fn form_from(record: &Review) -> ReviewForm {
        ReviewForm::from_record(record)
    }

    fn validate(form: &ReviewForm, rules: &FormRules) -> Result<ReviewPayload, DashboardError> {
        form.validate(rules.rating_scale)
    }
}

pub type ReviewList = ResourceList<Reviews>;
