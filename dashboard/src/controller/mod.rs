//! Resource list controllers: the fetch/create/update/delete lifecycle of a
//! backend collection plus its add/edit form.

pub mod list;
pub mod mutation;
pub mod notices;
pub mod release_notes;
pub mod resource;
pub mod reviews;
pub mod schedules;
