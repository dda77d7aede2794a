//! Fixtures
//!
//! Sample promotions and fields described in YAML, embedded at build time.

use thiserror::Error;

use crate::{
    discounts::DiscountError, fields::FieldError, money::MoneyParseError,
    promotions::PromotionError,
};

pub mod fields;
pub mod promotions;

pub use fields::{FieldFixture, FieldsFixture, sample_fields};
pub use promotions::{PromotionFixture, PromotionsFixture, sample_promotions};

const SAMPLE_PROMOTIONS: &str = include_str!("../../fixtures/promotions/samples.yml");
const SAMPLE_FIELDS: &str = include_str!("../../fixtures/fields/samples.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Price(#[from] MoneyParseError),

    /// Invalid percentage points
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(f64),

    /// Invalid promotion data
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Invalid discount data
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Invalid field data
    #[error(transparent)]
    Field(#[from] FieldError),
}
