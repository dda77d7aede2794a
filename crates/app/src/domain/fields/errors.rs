//! Fields service errors.

use pitchside::fields::FieldError;
use thiserror::Error;

use crate::{domain::StoreError, session::AccessError};

#[derive(Debug, Error)]
pub enum FieldsServiceError {
    #[error("field already exists")]
    AlreadyExists,

    #[error("field not found")]
    NotFound,

    #[error("invalid field: {0}")]
    Invalid(#[from] FieldError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for FieldsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict(_) => Self::AlreadyExists,
            error => Self::Store(error),
        }
    }
}
