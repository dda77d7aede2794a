//! Promotions service errors.

use pitchside::promotions::{PromotionCode, PromotionError};
use thiserror::Error;

use crate::{domain::StoreError, session::AccessError};

#[derive(Debug, Error)]
pub enum PromotionsServiceError {
    #[error("promotion already exists")]
    AlreadyExists,

    #[error("promotion not found")]
    NotFound,

    /// The code exists but cannot be used right now.
    #[error("promotion {0} is expired or inactive")]
    ExpiredOrInactive(PromotionCode),

    #[error("invalid promotion: {0}")]
    Invalid(#[from] PromotionError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for PromotionsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict(_) => Self::AlreadyExists,
            error => Self::Store(error),
        }
    }
}
