//! Fields

mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::FieldsServiceError;
pub use repository::*;
pub use service::*;
