//! Command handlers.

pub(crate) mod appointments;
pub(crate) mod auth;
