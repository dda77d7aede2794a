//! Money
//!
//! Amounts are held in minor units (satang for THB) using `rusty_money`.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Monetary amount in a statically known currency.
pub type Amount = Money<'static, Currency>;

/// Minor units per major unit for every supported currency.
const MINOR_PER_MAJOR: i64 = 100;

/// Errors raised while reading monetary values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    /// The value is not in the `AMOUNT CURRENCY` form.
    #[error("expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// The numeric part could not be parsed or represented.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not supported.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Resolve a supported ISO currency code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code.trim().to_ascii_uppercase().as_str() {
        "THB" => Some(iso::THB),
        "GBP" => Some(iso::GBP),
        "USD" => Some(iso::USD),
        "EUR" => Some(iso::EUR),
        _ => None,
    }
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Amount {
    Money::from_minor(0, currency)
}

/// Convert a major-unit decimal (e.g. `45.5`) into an amount.
///
/// # Errors
///
/// Returns [`MoneyParseError::InvalidAmount`] when the value does not fit in
/// minor units.
pub fn amount_from_decimal(
    value: Decimal,
    currency: &'static Currency,
) -> Result<Amount, MoneyParseError> {
    let minor = value
        .checked_mul(Decimal::from(MINOR_PER_MAJOR))
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| MoneyParseError::InvalidAmount(value.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}

/// Parse a price string such as `"500 THB"` or `"45.50 THB"`.
///
/// # Errors
///
/// Returns an error if the string is not `AMOUNT CURRENCY`, if the amount is
/// not a decimal number, or if the currency is unknown.
pub fn parse_price(s: &str) -> Result<Amount, MoneyParseError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(MoneyParseError::InvalidFormat(s.to_string()));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MoneyParseError::InvalidAmount(s.to_string()))?;

    let currency =
        currency_from_code(code).ok_or_else(|| MoneyParseError::UnknownCurrency(code.to_string()))?;

    amount_from_decimal(amount, currency)
}

/// Major units of an amount with trailing zeros removed (`20000` satang → `200`).
pub fn major_units(amount: &Amount) -> Decimal {
    Decimal::new(amount.to_minor_units(), 2).normalize()
}

/// Render an amount as `"<major> <ISO>"`, e.g. `"1250 THB"`.
pub fn format_amount(amount: &Amount) -> String {
    format!("{} {}", major_units(amount), amount.currency().iso_alpha_code)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_whole_and_fractional_amounts() -> TestResult {
        assert_eq!(parse_price("500 THB")?, Money::from_minor(50_000, iso::THB));
        assert_eq!(parse_price("45.5 thb")?, Money::from_minor(4_550, iso::THB));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_missing_currency() {
        assert!(matches!(
            parse_price("500"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        assert_eq!(
            parse_price("5 XYZ"),
            Err(MoneyParseError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn format_amount_drops_trailing_zeros() {
        assert_eq!(format_amount(&Money::from_minor(125_000, iso::THB)), "1250 THB");
        assert_eq!(format_amount(&Money::from_minor(4_550, iso::THB)), "45.5 THB");
    }
}
