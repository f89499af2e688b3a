//! Generic list controller.
//!
//! Owns the in-memory copy of one backend collection and the single add/edit
//! form that mutates it. Handles are cheap clones over shared state so that
//! user actions can run concurrently; the state lock is never held across a
//! request.
//!
//! Responses are keyed to the view lifetime: once [`ResourceList::detach`]
//! is called, anything still in flight is dropped instead of applied. Among
//! overlapping refreshes only the latest one is applied. Nothing guards
//! against two sessions editing the same record: the last write wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error};

use crate::controller::mutation::{MutationState, Removal};
use crate::controller::notices::Notifier;
use crate::controller::resource::{FormRules, Resource};
use crate::errors::DashboardError;
use crate::http::client::HttpClient;

/// The add/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<F> {
    /// Record being edited, `None` in create mode
    pub editing_id: Option<String>,
    pub fields: F,
}

/// What a refresh did with its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list was replaced with this many records
    Applied(usize),
    /// The response belonged to a detached view or was overtaken
    Discarded,
}

struct ListState<R: Resource> {
    items: Vec<R::Record>,
    loading: bool,
    form: Option<FormState<R::Form>>,
    form_epoch: u64,
    view_epoch: u64,
    fetch_seq: u64,
    removals: Vec<Removal<R::Record>>,
    outcomes: HashMap<String, MutationState>,
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            form: None,
            form_epoch: 0,
            view_epoch: 0,
            fetch_seq: 0,
            removals: Vec::new(),
            outcomes: HashMap::new(),
        }
    }
}

/// List controller for one resource collection
pub struct ResourceList<R: Resource> {
    http: Arc<HttpClient>,
    notifier: Arc<dyn Notifier>,
    rules: FormRules,
    state: Arc<Mutex<ListState<R>>>,
}

impl<R: Resource> Clone for ResourceList<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            notifier: self.notifier.clone(),
            rules: self.rules,
            state: self.state.clone(),
        }
    }
}

impl<R: Resource> ResourceList<R> {
    pub fn new(http: Arc<HttpClient>, notifier: Arc<dyn Notifier>, rules: FormRules) -> Self {
        Self {
            http,
            notifier,
            rules,
            state: Arc::new(Mutex::new(ListState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<R>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    /// Records in backend order
    pub fn items(&self) -> Vec<R::Record> {
        self.lock().items.clone()
    }

    pub fn find(&self, id: &str) -> Option<R::Record> {
        self.lock().items.iter().find(|r| R::id(r) == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_form_open(&self) -> bool {
        self.lock().form.is_some()
    }

    pub fn form(&self) -> Option<FormState<R::Form>> {
        self.lock().form.clone()
    }

    pub fn editing_id(&self) -> Option<String> {
        self.lock().form.as_ref().and_then(|f| f.editing_id.clone())
    }

    /// Latest optimistic mutation state recorded for `id`
    pub fn mutation_state(&self, id: &str) -> Option<MutationState> {
        self.lock().outcomes.get(id).copied()
    }

    /// End the current view. In-flight responses will be discarded.
    pub fn detach(&self) {
        let mut state = self.lock();
        state.view_epoch += 1;
        state.loading = false;
        state.form = None;
        state.items.clear();
        debug!("Detached {} view", R::PLURAL);
    }

    /// Fetch the whole collection and replace the list with it. On failure
    /// the list is left as it was.
    pub async fn refresh(&self) -> Result<RefreshOutcome, DashboardError> {
        let (view, seq) = {
            let mut state = self.lock();
            state.fetch_seq += 1;
            state.loading = true;
            (state.view_epoch, state.fetch_seq)
        };

        let result = self.http.list::<R>().await;

        let mut state = self.lock();
        if state.view_epoch != view || state.fetch_seq != seq {
            debug!("Discarding stale {} response", R::PLURAL);
            return Ok(RefreshOutcome::Discarded);
        }
        state.loading = false;

        match result {
            Ok(mut records) => {
                // hide records whose deletion is still in flight
                let pending: Vec<String> = state.removals.iter().map(|r| r.id().to_string()).collect();
                records.retain(|r| !pending.iter().any(|id| id == R::id(r)));
                let count = records.len();
                state.items = records;
                debug!("Loaded {} {}", count, R::PLURAL);
                Ok(RefreshOutcome::Applied(count))
            }
            Err(e) => {
                drop(state);
                self.fail(&e, &format!("Error fetching {}", R::PLURAL));
                Err(e)
            }
        }
    }

    /// Open the form in create mode with default fields
    pub fn open_create(&self) {
        let fields = R::new_form(&self.rules);
        let mut state = self.lock();
        state.form_epoch += 1;
        state.form = Some(FormState {
            editing_id: None,
            fields,
        });
    }

    /// Open the form in edit mode on a copy of `record`
    pub fn open_edit(&self, record: &R::Record) {
        let mut state = self.lock();
        state.form_epoch += 1;
        state.form = Some(FormState {
            editing_id: Some(R::id(record).to_string()),
            fields: R::form_from(record),
        });
    }

    /// Change the working copy of the open form
    pub fn edit_form<F>(&self, edit: F) -> Result<(), DashboardError>
    where
        F: FnOnce(&mut R::Form),
    {
        let mut state = self.lock();
        let form = state
            .form
            .as_mut()
            .ok_or_else(|| DashboardError::ValidationError("No form is open".to_string()))?;
        edit(&mut form.fields);
        Ok(())
    }

    pub fn close_form(&self) {
        self.lock().form = None;
    }

    /// Validate and send the open form. On success the form closes and the
    /// list is refreshed; on failure the form stays open.
    pub async fn submit(&self) -> Result<(), DashboardError> {
        let prepared = {
            let state = self.lock();
            match state.form.as_ref() {
                None => Err(DashboardError::ValidationError("No form is open".to_string())),
                Some(form) => R::validate(&form.fields, &self.rules)
                    .map(|payload| (form.editing_id.clone(), payload, state.form_epoch, state.view_epoch)),
            }
        };
        let (editing_id, payload, form_epoch, view) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.fail(&e, &format!("Error saving {}", R::SINGULAR));
                return Err(e);
            }
        };

        let result = match &editing_id {
            Some(id) => self.http.update::<R>(id, &payload).await.map(|_| ()),
            None => self.http.create::<R>(&payload).await.map(|_| ()),
        };

        if let Err(e) = result {
            self.fail(&e, &format!("Error saving {}", R::SINGULAR));
            return Err(e);
        }

        let still_mounted = {
            let mut state = self.lock();
            if state.form_epoch == form_epoch {
                state.form = None;
            }
            state.view_epoch == view
        };

        let verb = if editing_id.is_some() { "updated" } else { "added" };
        self.notifier.success(format!("{} {}", R::TITLE, verb));

        if still_mounted {
            // refresh failures are reported by refresh itself
            let _ = self.refresh().await;
        }
        Ok(())
    }

    /// Delete a record optimistically: it leaves the list at once and comes
    /// back, unchanged and in place, if the backend refuses.
    pub async fn remove(&self, id: &str) -> Result<(), DashboardError> {
        let begun = {
            let mut state = self.lock();
            if state.removals.iter().any(|r| r.id() == id) {
                Err(DashboardError::ValidationError(format!(
                    "This {} is already being deleted",
                    R::SINGULAR
                )))
            } else {
                match Removal::begin(&mut state.items, id, R::id) {
                    Some(removal) => {
                        state.outcomes.insert(id.to_string(), MutationState::Pending);
                        state.removals.push(removal);
                        Ok(state.view_epoch)
                    }
                    None => Err(DashboardError::NotFound(format!(
                        "No {} with id {}",
                        R::SINGULAR,
                        id
                    ))),
                }
            }
        };
        let view = match begun {
            Ok(view) => view,
            Err(e) => {
                self.fail(&e, &format!("Error deleting {}", R::SINGULAR));
                return Err(e);
            }
        };

        let result = self.http.remove::<R>(id).await;

        let mut state = self.lock();
        let removal = state
            .removals
            .iter()
            .position(|r| r.id() == id)
            .map(|index| state.removals.remove(index));
        let mounted = state.view_epoch == view;

        match result {
            Ok(()) => {
                if let Some(mut removal) = removal {
                    removal.commit();
                }
                state.outcomes.insert(id.to_string(), MutationState::Committed);
                drop(state);
                self.notifier.success(format!("{} deleted", R::TITLE));
                Ok(())
            }
            Err(e) => {
                if let Some(mut removal) = removal {
                    if mounted {
                        removal.roll_back(&mut state.items, R::id);
                    }
                }
                state.outcomes.insert(id.to_string(), MutationState::RolledBack);
                drop(state);
                self.fail(&e, &format!("Error deleting {}", R::SINGULAR));
                Err(e)
            }
        }
    }

    pub(crate) fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub(crate) fn view_epoch(&self) -> u64 {
        self.lock().view_epoch
    }

    /// Trace a failed operation and tell the user about it
    pub(crate) fn fail(&self, err: &DashboardError, fallback: &str) {
        error!("{}: {}", fallback, err);
        self.notifier.error(err.user_message(fallback));
    }
}
