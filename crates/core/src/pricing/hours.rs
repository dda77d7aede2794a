//! Billable Hours

use jiff::Timestamp;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::Money;

use crate::{money::Amount, pricing::PricingError};

const MILLISECONDS_PER_HOUR: i64 = 3_600_000;

/// A booking duration in hours, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BillableHours(Decimal);

impl BillableHours {
    /// Duration from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::IndeterminateDuration`] if `end` precedes `start`.
    pub fn between(start: Timestamp, end: Timestamp) -> Result<Self, PricingError> {
        let elapsed = end.as_millisecond() - start.as_millisecond();

        if elapsed < 0 {
            return Err(PricingError::IndeterminateDuration(format!(
                "end {end} precedes start {start}"
            )));
        }

        let hours = Decimal::from_i64(elapsed)
            .and_then(|ms| ms.checked_div(Decimal::from(MILLISECONDS_PER_HOUR)))
            .ok_or_else(|| PricingError::IndeterminateDuration(format!("{start} to {end}")))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Ok(Self(hours))
    }

    /// Hours as a decimal.
    pub const fn hours(&self) -> Decimal {
        self.0
    }

    /// `rate × hours`, rounded to minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidInput`] if the charge overflows.
    pub fn charge(&self, rate: &Amount) -> Result<Amount, PricingError> {
        let minor = Decimal::from_i64(rate.to_minor_units())
            .and_then(|rate| rate.checked_mul(self.0))
            .map(|charge| charge.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|charge| charge.to_i64())
            .ok_or_else(|| PricingError::InvalidInput("charge overflows".to_string()))?;

        Ok(Money::from_minor(minor, rate.currency()))
    }
}

/// Parse a stored booking instant.
///
/// # Errors
///
/// An unreadable timestamp makes the duration unknowable, so this returns
/// [`PricingError::IndeterminateDuration`] rather than a parse error.
pub fn parse_instant(raw: &str) -> Result<Timestamp, PricingError> {
    raw.trim()
        .parse::<Timestamp>()
        .map_err(|err| PricingError::IndeterminateDuration(format!("{raw:?}: {err}")))
}
