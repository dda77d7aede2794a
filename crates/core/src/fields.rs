//! Fields

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::money::Amount;

/// Errors raised while reading fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The status was neither `available` nor `unavailable`.
    #[error("unknown field status: {0}")]
    UnknownStatus(String),

    /// Negative hourly rate.
    #[error("hourly rate of {0} must not be negative")]
    NegativeRate(String),
}

/// Whether a field can be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldStatus {
    /// Open for bookings.
    #[default]
    Available,

    /// Closed, e.g. for maintenance.
    Unavailable,
}

impl FieldStatus {
    /// Stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }

    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Available => Self::Unavailable,
            Self::Unavailable => Self::Available,
        }
    }
}

impl FromStr for FieldStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(FieldError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable pitch or hall.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Display name, e.g. `"Stadium 1(VIP)"`.
    pub name: String,

    /// Free-text description.
    pub description: String,

    /// Where the field is.
    pub location: String,

    /// Price of one hour.
    pub hourly_rate: Amount,

    /// Format such as `"7v7"`.
    pub size: String,

    /// Playing surface.
    pub surface: String,

    /// Bookable or not.
    pub status: FieldStatus,
}

impl Field {
    /// Create an available field with empty descriptive attributes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NegativeRate`] for a negative hourly rate.
    pub fn new(name: impl Into<String>, hourly_rate: Amount) -> Result<Self, FieldError> {
        let field = Self {
            name: name.into(),
            description: String::new(),
            location: String::new(),
            hourly_rate,
            size: String::new(),
            surface: String::new(),
            status: FieldStatus::Available,
        };

        field.validate()?;

        Ok(field)
    }

    /// Check a field whose attributes were edited in place.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NegativeRate`] for a negative hourly rate.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.hourly_rate.to_minor_units() < 0 {
            return Err(FieldError::NegativeRate(self.hourly_rate.to_string()));
        }

        Ok(())
    }

    /// Whether new bookings are accepted.
    pub fn is_bookable(&self) -> bool {
        self.status == FieldStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::THB};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_field_is_bookable() -> TestResult {
        let field = Field::new("Stadium 3", Money::from_minor(3_500, THB))?;

        assert!(field.is_bookable());
        assert_eq!(field.status.as_str(), "available");

        Ok(())
    }

    #[test]
    fn negative_rate_is_rejected() {
        let result = Field::new("Stadium 3", Money::from_minor(-1, THB));

        assert!(matches!(result, Err(FieldError::NegativeRate(_))));
    }

    #[test]
    fn edited_rate_is_revalidated() -> TestResult {
        let mut field = Field::new("Stadium 3", Money::from_minor(3_500, THB))?;

        field.hourly_rate = Money::from_minor(-100, THB);

        assert!(matches!(field.validate(), Err(FieldError::NegativeRate(_))));

        Ok(())
    }

    #[test]
    fn toggled_status_flips() {
        assert_eq!(FieldStatus::Available.toggled(), FieldStatus::Unavailable);
        assert_eq!(FieldStatus::Unavailable.toggled(), FieldStatus::Available);
    }

    #[test]
    fn status_round_trips_through_text() -> TestResult {
        assert_eq!("Unavailable".parse::<FieldStatus>()?, FieldStatus::Unavailable);
        assert!("closed".parse::<FieldStatus>().is_err());

        Ok(())
    }
}
