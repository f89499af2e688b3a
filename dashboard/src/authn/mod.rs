//! Authentication: session token, session store, registration form

pub mod registration;
pub mod session;
pub mod token;
