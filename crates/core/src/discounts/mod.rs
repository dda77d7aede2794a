//! Discount utilities
//!
//! A promotion grants at most one kind of discount: a fixed amount off the
//! base price, or a percentage of it.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::Money;
use thiserror::Error;

use crate::money::{Amount, major_units};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Both a fixed amount and a percentage were supplied.
    #[error("a promotion may carry a fixed amount or a percentage, not both")]
    AmbiguousDiscount,

    /// Percentage points outside `(0, 100]`.
    #[error("percentage must be greater than 0 and at most 100, got {0}")]
    PercentageOutOfRange(Decimal),

    /// Fixed amount that is zero or negative.
    #[error("discount amount must be positive")]
    NonPositiveAmount,
}

/// The single discount mode a promotion grants.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PromotionDiscount {
    /// Subtract a fixed amount from the base price (e.g. "200 THB off").
    AmountOff(Amount),

    /// Subtract a percentage of the base price (e.g. "20% off").
    PercentageOff(Percentage),
}

impl PromotionDiscount {
    /// Fixed amount discount; the amount must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::NonPositiveAmount`] for zero or negative amounts.
    pub fn amount_off(amount: Amount) -> Result<Self, DiscountError> {
        if amount.to_minor_units() <= 0 {
            return Err(DiscountError::NonPositiveAmount);
        }

        Ok(Self::AmountOff(amount))
    }

    /// Percentage discount from percent points (`20` is 20%).
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentageOutOfRange`] unless `0 < points <= 100`.
    pub fn percentage_points(points: Decimal) -> Result<Self, DiscountError> {
        if points <= Decimal::ZERO || points > Decimal::ONE_HUNDRED {
            return Err(DiscountError::PercentageOutOfRange(points));
        }

        Ok(Self::PercentageOff(Percentage::from(
            points / Decimal::ONE_HUNDRED,
        )))
    }

    /// Build the discount from the two nullable columns a store keeps.
    ///
    /// Zero and negative values count as absent. Returns `None` when neither
    /// column holds a positive value.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::AmbiguousDiscount`] when both are positive, or
    /// [`DiscountError::PercentageOutOfRange`] for a percentage above 100.
    pub fn from_columns(
        amount: Option<Amount>,
        percentage_points: Option<Decimal>,
    ) -> Result<Option<Self>, DiscountError> {
        let amount = amount.filter(|amount| amount.to_minor_units() > 0);
        let points = percentage_points.filter(|points| *points > Decimal::ZERO);

        match (amount, points) {
            (Some(_), Some(_)) => Err(DiscountError::AmbiguousDiscount),
            (Some(amount), None) => Ok(Some(Self::AmountOff(amount))),
            (None, Some(points)) => Self::percentage_points(points).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Fixed amount, if this is an amount discount.
    pub fn amount(&self) -> Option<Amount> {
        match self {
            Self::AmountOff(amount) => Some(*amount),
            Self::PercentageOff(_) => None,
        }
    }

    /// Percent points, if this is a percentage discount.
    pub fn points(&self) -> Option<Decimal> {
        match self {
            Self::AmountOff(_) => None,
            Self::PercentageOff(percent) => Some(percent_points(*percent)),
        }
    }

    /// Short label, e.g. `"off by 200 THB"` or `"off by 20%"`.
    pub fn label(&self) -> String {
        match self {
            Self::AmountOff(amount) => format!(
                "off by {} {}",
                major_units(amount),
                amount.currency().iso_alpha_code
            ),
            Self::PercentageOff(percent) => format!("off by {}%", percent_points(*percent)),
        }
    }

    /// Discount granted on `base`, before clamping to the base price.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the percentage cannot be
    /// represented in minor units.
    pub fn raw_discount(&self, base: &Amount) -> Result<Amount, DiscountError> {
        match self {
            Self::AmountOff(amount) => Ok(*amount),
            Self::PercentageOff(percent) => Ok(Money::from_minor(
                percent_of_minor(percent, base.to_minor_units())?,
                base.currency(),
            )),
        }
    }
}

/// Convert a fractional percentage to percent points (`0.2` → `20`).
pub fn percent_points(percent: Percentage) -> Decimal {
    ((percent * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns an error if the percentage calculation overflows or cannot be
/// safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
