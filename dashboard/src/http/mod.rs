//! Backend HTTP access

pub mod auth;
pub mod client;
pub mod resources;
