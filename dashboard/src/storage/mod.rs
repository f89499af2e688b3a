//! Local persistence: layout, settings and the session token

pub mod layout;
pub mod settings;
pub mod token_store;
