//! Hosted backend access.

pub mod rest;
pub mod schema;
