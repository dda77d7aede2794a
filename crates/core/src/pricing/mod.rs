//! Pricing
//!
//! Pure functions computing what a booking costs: base price from the hourly
//! rate, the promotion discount, and the final charge.

use jiff::Timestamp;
use rusty_money::{Money, MoneyError};
use thiserror::Error;

use crate::{discounts::DiscountError, money::Amount, promotions::Promotion};

mod hours;

pub use hours::{BillableHours, parse_instant};

/// Errors raised by the pricing calculator.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A negative rate or price was supplied.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Start/end instants do not describe a usable interval.
    #[error("booking duration cannot be determined: {0}")]
    IndeterminateDuration(String),

    /// The discount could not be computed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Base price, discount and final price of one booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    /// Undiscounted price.
    pub base: Amount,

    /// Discount granted, never above `base`.
    pub discount: Amount,

    /// `base - discount`, never below zero.
    pub final_price: Amount,
}

fn ensure_non_negative(amount: &Amount, what: &str) -> Result<(), PricingError> {
    if amount.to_minor_units() < 0 {
        return Err(PricingError::InvalidInput(format!(
            "{what} must not be negative"
        )));
    }

    Ok(())
}

/// Price of `slots` one-hour slots at `rate` per hour.
///
/// # Errors
///
/// Returns [`PricingError::InvalidInput`] for a negative rate or if the
/// product overflows.
pub fn base_price(rate: &Amount, slots: usize) -> Result<Amount, PricingError> {
    ensure_non_negative(rate, "hourly rate")?;

    let minor = i64::try_from(slots)
        .ok()
        .and_then(|slots| rate.to_minor_units().checked_mul(slots))
        .ok_or_else(|| PricingError::InvalidInput("base price overflows".to_string()))?;

    Ok(Money::from_minor(minor, rate.currency()))
}

/// Discount granted by `promotion` on `base` at instant `now`.
///
/// An absent promotion, or one that is inactive or outside its window,
/// grants nothing. Fixed amounts take effect as-is; percentages apply to the
/// base. The result is clamped to `[0, base]`.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: `base` is negative.
/// - [`PricingError::Money`]: the promotion is in another currency.
/// - [`PricingError::Discount`]: the percentage cannot be represented.
pub fn calculate_discount(
    base: &Amount,
    promotion: Option<&Promotion>,
    now: Timestamp,
) -> Result<Amount, PricingError> {
    ensure_non_negative(base, "base price")?;

    let zero = Money::from_minor(0, base.currency());

    let Some(discount) = promotion
        .filter(|promotion| promotion.is_valid(now))
        .and_then(Promotion::discount)
    else {
        return Ok(zero);
    };

    let raw = discount.raw_discount(base)?;

    if raw.currency() != base.currency() {
        return Err(PricingError::Money(MoneyError::CurrencyMismatch {
            expected: base.currency().iso_alpha_code,
            actual: raw.currency().iso_alpha_code,
        }));
    }

    let clamped = raw
        .to_minor_units()
        .clamp(0, base.to_minor_units());

    Ok(Money::from_minor(clamped, base.currency()))
}

/// Final charge: `max(0, base - discount)`. Without a promotion this is `base`.
///
/// # Errors
///
/// See [`calculate_discount`].
pub fn calculate_final_price(
    base: &Amount,
    promotion: Option<&Promotion>,
    now: Timestamp,
) -> Result<Amount, PricingError> {
    Ok(price_breakdown(base, promotion, now)?.final_price)
}

/// Base, discount and final price together.
///
/// # Errors
///
/// See [`calculate_discount`].
pub fn price_breakdown(
    base: &Amount,
    promotion: Option<&Promotion>,
    now: Timestamp,
) -> Result<PriceBreakdown, PricingError> {
    let discount = calculate_discount(base, promotion, now)?;
    let final_price = Money::from_minor(
        0.max(base.to_minor_units() - discount.to_minor_units()),
        base.currency(),
    );

    Ok(PriceBreakdown {
        base: *base,
        discount,
        final_price,
    })
}

/// Expected charge for a booking held from `start` to `end` at `rate` per hour.
///
/// The duration is rounded to hundredths of an hour before the rate is
/// applied; the promotion is then applied as in [`calculate_discount`].
///
/// # Errors
///
/// - [`PricingError::IndeterminateDuration`]: `end` precedes `start`.
/// - any error from [`calculate_discount`].
pub fn expected_price(
    rate: &Amount,
    start: Timestamp,
    end: Timestamp,
    promotion: Option<&Promotion>,
    now: Timestamp,
) -> Result<PriceBreakdown, PricingError> {
    ensure_non_negative(rate, "hourly rate")?;

    let hours = BillableHours::between(start, end)?;
    let base = hours.charge(rate)?;

    price_breakdown(&base, promotion, now)
}
