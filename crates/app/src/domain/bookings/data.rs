//! Bookings Data

use jiff::{Timestamp, civil::Date};
use pitchside::{
    money::Amount,
    pricing::PriceBreakdown,
    promotions::PromotionCode,
    slots::SlotSelection,
};

use crate::{
    domain::{
        bookings::records::{BookingRecord, BookingUuid},
        fields::records::FieldUuid,
        promotions::{data::LookupSource, records::PromotionUuid},
    },
    session::UserUuid,
};

/// What the customer picked on the booking page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub field: FieldUuid,
    pub date: Date,
    /// Start hours of the selected slots.
    pub hours: Vec<i8>,
    pub promotion_code: Option<String>,
}

/// Promotion applied to a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromotion {
    pub uuid: Option<PromotionUuid>,
    pub code: PromotionCode,
    pub display_text: String,
    pub source: LookupSource,
}

/// Priced slot selection shown before confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingQuote {
    pub field: FieldUuid,
    pub field_name: String,
    pub slots: SlotSelection,
    pub hourly_rate: Amount,
    pub price: PriceBreakdown,
    pub promotion: Option<AppliedPromotion>,
    pub quoted_at: Timestamp,
}

/// New Booking Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub uuid: BookingUuid,
    pub user: UserUuid,
    pub field: FieldUuid,
    pub slots: SlotSelection,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub promotion: Option<PromotionUuid>,
    pub total: Amount,
}

/// Expected charge of a stored booking.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedPrice {
    Amount(PriceBreakdown),

    /// The booking's start or end could not be used; carries the reason.
    Indeterminate(String),
}

/// One row of the admin bookings report.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReport {
    pub booking: BookingRecord,
    pub field_name: Option<String>,
    pub promotion_code: Option<PromotionCode>,
    pub expected: ExpectedPrice,
}
