//! Validity Windows

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};

use crate::promotions::PromotionError;

/// Inclusive `[valid_from, valid_until]` interval in which a promotion may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    valid_from: Timestamp,
    valid_until: Timestamp,
}

impl ValidityWindow {
    /// Create a window.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidWindow`] if `valid_from` is after `valid_until`.
    pub fn new(valid_from: Timestamp, valid_until: Timestamp) -> Result<Self, PromotionError> {
        if valid_from > valid_until {
            return Err(PromotionError::InvalidWindow {
                valid_from,
                valid_until,
            });
        }

        Ok(Self {
            valid_from,
            valid_until,
        })
    }

    /// Create a window from stored bound strings (see [`parse_bound`]).
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is unreadable or the bounds are reversed.
    pub fn parse(valid_from: &str, valid_until: &str) -> Result<Self, PromotionError> {
        Self::new(parse_bound(valid_from)?, parse_bound(valid_until)?)
    }

    /// First instant of the window.
    pub const fn valid_from(&self) -> Timestamp {
        self.valid_from
    }

    /// Last instant of the window.
    pub const fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    /// Whether `now` falls inside the window, both bounds included.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }
}

/// Parse a stored window bound.
///
/// Accepts RFC 3339 instants (`2025-01-01T00:00:00Z`), naive date-times
/// (`2025-01-01T09:30`) and plain dates (`2025-01-01`). Values without an
/// offset are wall-clock UTC; a plain date is midnight at the start of that day.
///
/// # Errors
///
/// Returns [`PromotionError::InvalidBound`] if no format matches.
pub fn parse_bound(raw: &str) -> Result<Timestamp, PromotionError> {
    let raw = raw.trim();

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let datetime = match raw.parse::<DateTime>() {
        Ok(datetime) => datetime,
        Err(_) => raw
            .parse::<Date>()
            .map_err(|_err| PromotionError::InvalidBound(raw.to_string()))?
            .to_datetime(jiff::civil::Time::midnight()),
    };

    datetime
        .to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|_err| PromotionError::InvalidBound(raw.to_string()))
}
