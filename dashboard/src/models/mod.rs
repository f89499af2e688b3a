//! Resource records and their form payloads

pub mod dates;
pub mod release_note;
pub mod review;
pub mod schedule;
pub mod time_slot;
