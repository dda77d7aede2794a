//! Pitchside Domain Concerns

pub mod bookings;
mod errors;
pub mod fields;
pub mod promotions;

pub use errors::{SeedError, StoreError};
