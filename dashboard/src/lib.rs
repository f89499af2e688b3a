//! Release board client library
//!
//! Session handling, route gating and list controllers for the deployment
//! schedule, release notes and reviews pages of the release board backend.

pub mod app;
pub mod authn;
pub mod controller;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod routes;
pub mod shell;
pub mod storage;
