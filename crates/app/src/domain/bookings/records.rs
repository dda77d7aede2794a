//! Bookings Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use pitchside::{money::Amount, slots::SlotSelection};
use thiserror::Error;

use crate::{
    domain::{fields::records::FieldUuid, promotions::records::PromotionUuid},
    session::UserUuid,
    uuids::TypedUuid,
};

/// Booking UUID
pub type BookingUuid = TypedUuid<BookingRecord>;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownStatus {
    kind: &'static str,
    value: String,
}

/// Booking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the booking still holds its slots.
    pub fn holds_slots(&self) -> bool {
        *self != Self::Cancelled
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus {
                kind: "booking status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(UnknownStatus {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking Record
///
/// `start_time` and `end_time` are kept as the text the store holds so that
/// reports can flag rows whose instants cannot be read.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub uuid: BookingUuid,
    pub user: UserUuid,
    pub field: FieldUuid,
    pub slots: Option<SlotSelection>,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub promotion: Option<PromotionUuid>,
    pub total: Amount,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_parse_from_stored_text() -> TestResult {
        assert_eq!("Confirmed".parse::<BookingStatus>()?, BookingStatus::Confirmed);
        assert_eq!("canceled".parse::<BookingStatus>()?, BookingStatus::Cancelled);
        assert_eq!("paid".parse::<PaymentStatus>()?, PaymentStatus::Paid);
        assert!("refunded".parse::<PaymentStatus>().is_err());

        Ok(())
    }

    #[test]
    fn cancelled_bookings_release_slots() {
        assert!(BookingStatus::Pending.holds_slots());
        assert!(!BookingStatus::Cancelled.holds_slots());
    }
}
