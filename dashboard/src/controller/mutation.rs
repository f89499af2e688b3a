//! Optimistic removal with exact rollback

/// Lifecycle of an optimistic mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied locally, backend has not answered yet
    Pending,
    /// Backend confirmed
    Committed,
    /// Backend refused; the local change was undone
    RolledBack,
}

/// A record taken out of a list ahead of the backend's confirmation
#[derive(Debug, Clone)]
pub struct Removal<T> {
    id: String,
    index: usize,
    record: T,
    state: MutationState,
}

impl<T: Clone> Removal<T> {
    /// Take the record with `id` out of `items`
    pub fn begin<F>(items: &mut Vec<T>, id: &str, id_of: F) -> Option<Self>
    where
        F: Fn(&T) -> &str,
    {
        let index = items.iter().position(|item| id_of(item) == id)?;
        let record = items.remove(index);
        Some(Self {
            id: id.to_string(),
            index,
            record,
            state: MutationState::Pending,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn commit(&mut self) {
        self.state = MutationState::Committed;
    }

    /// Put the exact removed record back where it was. Nothing is inserted
    /// if the list already holds a record with the same id again.
    pub fn roll_back<F>(&mut self, items: &mut Vec<T>, id_of: F)
    where
        F: Fn(&T) -> &str,
    {
        if !items.iter().any(|item| id_of(item) == self.id) {
            let index = self.index.min(items.len());
            items.insert(index, self.record.clone());
        }
        self.state = MutationState::RolledBack;
    }
}
