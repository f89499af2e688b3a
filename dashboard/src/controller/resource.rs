//! Resource descriptions driving the generic list controller

use std::fmt::Debug;

use chrono::{Local, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::DashboardError;
use crate::models::review::RatingScale;

/// HTTP verb used to update a member of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Patch,
    Put,
}

/// Configurable form rules
#[derive(Debug, Clone, Copy, Default)]
pub struct FormRules {
    pub rating_scale: RatingScale,
    pub allow_inverted_dates: bool,
}

impl FormRules {
    /// Date new forms start from
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A backend collection managed through a list page
pub trait Resource: Send + Sync + 'static {
    /// Record as returned by the backend
    type Record: Clone + Debug + DeserializeOwned + Send + Sync + 'static;

    /// Working copy edited in the form
    type Form: Clone + Debug + Send + Sync + 'static;

    /// Validated create/update body
    type Payload: Serialize + Send + Sync + 'static;

    /// Collection path, e.g. `/schedules`
    const COLLECTION: &'static str;

    /// Lowercase singular noun used in messages
    const SINGULAR: &'static str;

    /// Lowercase plural noun used in messages
    const PLURAL: &'static str;

    /// Capitalized singular noun used in messages
    const TITLE: &'static str;

    const UPDATE_METHOD: UpdateMethod;

    fn id(record: &Self::Record) -> &str;

    /// Defaults for create mode
    fn new_form(rules: &FormRules) -> Self::Form;

    /// Copy of the editable fields of `record` for edit mode
    fn form_from(record: &Self::Record) -> Self::Form;

    /// Local checks; never reaches the backend when this fails
    fn validate(form: &Self::Form, rules: &FormRules) -> Result<Self::Payload, DashboardError>;
}
