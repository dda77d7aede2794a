//! Bookings service errors.

use pitchside::{pricing::PricingError, promotions::PromotionCode, slots::SlotError};
use thiserror::Error;

use crate::{
    domain::{StoreError, promotions::PromotionsServiceError},
    session::AccessError,
};

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("field not found")]
    UnknownField,

    #[error("field is not available for booking")]
    FieldUnavailable,

    #[error("no slots selected")]
    NoSlotsSelected,

    #[error(transparent)]
    Slot(#[from] SlotError),

    /// A booking covers one unbroken interval; split a gapped selection.
    #[error("selected slots must be consecutive to book")]
    NonContiguousSlots,

    /// Another booking already holds the slot.
    #[error("slot {0} is already booked")]
    SlotUnavailable(String),

    /// The quote was priced with a promotion the store never confirmed.
    #[error("promotion {0} could not be verified; quote again once the store is reachable")]
    UnverifiedPromotion(PromotionCode),

    #[error("booking not found")]
    NotFound,

    #[error(transparent)]
    Promotion(#[from] PromotionsServiceError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for BookingsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict(slot) => Self::SlotUnavailable(slot),
            error => Self::Store(error),
        }
    }
}
