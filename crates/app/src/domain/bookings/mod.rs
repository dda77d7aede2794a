//! Bookings

pub mod data;
mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::BookingsServiceError;
pub use repository::*;
pub use service::*;
