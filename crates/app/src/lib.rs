//! Booking services, stores and configuration for the Pitchside CLI.

pub mod backend;
pub mod config;
pub mod context;
pub mod domain;
pub mod observability;
pub mod session;

mod uuids;
