//! Pricing Config

use clap::Args;
use jiff::tz::{self, TimeZone};
use pitchside::{money::currency_from_code, slots::OpeningHours};
use rusty_money::iso::Currency;

use super::ConfigError;

/// Currency, opening hours and the facility's time zone.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// ISO currency of every price
    #[arg(long, env = "PITCHSIDE_CURRENCY", default_value = "THB", global = true)]
    pub currency: String,

    /// First bookable hour
    #[arg(long, env = "PITCHSIDE_OPEN_HOUR", default_value_t = 13, global = true)]
    pub open_hour: i8,

    /// Hour the facility closes (24 = midnight)
    #[arg(long, env = "PITCHSIDE_CLOSE_HOUR", default_value_t = 24, global = true)]
    pub close_hour: i8,

    /// Facility time zone as hours east of UTC
    #[arg(
        long,
        env = "PITCHSIDE_UTC_OFFSET",
        default_value_t = 7,
        allow_negative_numbers = true,
        global = true
    )]
    pub utc_offset: i8,
}

impl PricingConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for an unsupported code.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        currency_from_code(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::OpeningHours`] if the hours are out of order.
    pub fn opening_hours(&self) -> Result<OpeningHours, ConfigError> {
        Ok(OpeningHours::new(self.open_hour, self.close_hour)?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::UtcOffset`] outside `-25..=25` hours.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        if !(-25..=25).contains(&self.utc_offset) {
            return Err(ConfigError::UtcOffset(self.utc_offset));
        }

        Ok(TimeZone::fixed(tz::offset(self.utc_offset)))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        pricing: PricingConfig,
    }

    #[test]
    fn defaults_describe_the_facility() -> TestResult {
        let harness = Harness::try_parse_from(["pitchside"])?;

        assert_eq!(harness.pricing.currency()?.iso_alpha_code, "THB");
        assert_eq!(harness.pricing.opening_hours()?, OpeningHours::default());
        assert_eq!(harness.pricing.time_zone()?.to_fixed_offset()?, tz::offset(7));

        Ok(())
    }

    #[test]
    fn unsupported_currency_is_rejected() -> TestResult {
        let harness = Harness::try_parse_from(["pitchside", "--currency", "XYZ"])?;

        assert_eq!(
            harness.pricing.currency(),
            Err(ConfigError::UnknownCurrency("XYZ".to_string()))
        );

        Ok(())
    }

    #[test]
    fn reversed_opening_hours_are_rejected() -> TestResult {
        let harness =
            Harness::try_parse_from(["pitchside", "--open-hour", "20", "--close-hour", "10"])?;

        assert!(matches!(
            harness.pricing.opening_hours(),
            Err(ConfigError::OpeningHours(_))
        ));

        Ok(())
    }

    #[test]
    fn offset_beyond_a_day_is_rejected() -> TestResult {
        let harness = Harness::try_parse_from(["pitchside", "--utc-offset", "30"])?;

        assert!(matches!(
            harness.pricing.time_zone(),
            Err(ConfigError::UtcOffset(30))
        ));

        Ok(())
    }

    #[test]
    fn negative_offset_is_accepted() -> TestResult {
        let harness = Harness::try_parse_from(["pitchside", "--utc-offset", "-5"])?;

        assert_eq!(harness.pricing.time_zone()?.to_fixed_offset()?, tz::offset(-5));

        Ok(())
    }
}
