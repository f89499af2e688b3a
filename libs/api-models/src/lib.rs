//! Wire models for the release board backend

pub mod models;
