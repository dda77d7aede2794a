//! Promotion Fixtures

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    discounts::PromotionDiscount,
    fixtures::{FixtureError, SAMPLE_PROMOTIONS},
    money::parse_price,
    promotions::{Promotion, PromotionCode, PromotionStatus, ValidityWindow},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion code -> promotion fixture
    pub promotions: FxHashMap<String, PromotionFixture>,
}

impl PromotionsFixture {
    /// Build every promotion, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry's error.
    pub fn into_promotions(self) -> Result<Vec<Promotion>, FixtureError> {
        let mut promotions = self
            .promotions
            .into_iter()
            .map(|(code, fixture)| fixture.into_promotion(&code))
            .collect::<Result<Vec<_>, _>>()?;

        promotions.sort_by(|a, b| a.code().cmp(b.code()));

        Ok(promotions)
    }
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Discount mode; omitted for a label-only promotion
    #[serde(default)]
    pub discount: Option<DiscountFixture>,

    /// Start of the validity window
    pub valid_from: String,

    /// End of the validity window
    pub valid_until: String,

    /// `active` or `inactive`
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    PromotionStatus::Active.as_str().to_string()
}

/// Discount configuration from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Fixed amount, e.g. `"200 THB"`
    AmountOff {
        /// Amount with currency
        value: String,
    },

    /// Percent points, e.g. `20` for 20%
    PercentageOff {
        /// Percent points
        value: f64,
    },
}

impl TryFrom<DiscountFixture> for PromotionDiscount {
    type Error = FixtureError;

    fn try_from(fixture: DiscountFixture) -> Result<Self, Self::Error> {
        match fixture {
            DiscountFixture::AmountOff { value } => {
                Ok(PromotionDiscount::amount_off(parse_price(&value)?)?)
            }
            DiscountFixture::PercentageOff { value } => {
                let points =
                    Decimal::from_f64(value).ok_or(FixtureError::InvalidPercentage(value))?;

                Ok(PromotionDiscount::percentage_points(points)?)
            }
        }
    }
}

impl PromotionFixture {
    /// Convert to a [`Promotion`] with the given code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code, discount, window or status is invalid.
    pub fn into_promotion(self, code: &str) -> Result<Promotion, FixtureError> {
        let discount = self.discount.map(PromotionDiscount::try_from).transpose()?;

        let promotion = Promotion::new(
            PromotionCode::parse(code)?,
            discount,
            ValidityWindow::parse(&self.valid_from, &self.valid_until)?,
            self.status.parse::<PromotionStatus>()?,
        );

        Ok(match self.description {
            Some(description) => promotion.with_description(description),
            None => promotion,
        })
    }
}

/// The built-in sample promotions, ordered by code.
///
/// # Errors
///
/// Returns an error if the embedded fixture is invalid.
pub fn sample_promotions() -> Result<Vec<Promotion>, FixtureError> {
    let fixture: PromotionsFixture = serde_norway::from_str(SAMPLE_PROMOTIONS)?;

    fixture.into_promotions()
}
