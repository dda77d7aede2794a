//! Promotions Data

use jiff::Timestamp;
use pitchside::{
    discounts::PromotionDiscount,
    money::Amount,
    promotions::{Promotion, PromotionCode, PromotionError, PromotionStatus, ValidityWindow},
};
use rust_decimal::Decimal;

use crate::domain::promotions::records::{PromotionRecord, PromotionUuid};

/// Promotion as entered by an administrator, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionDraft {
    pub code: String,
    pub description: Option<String>,
    pub discount_amount: Option<Amount>,
    pub discount_percentage: Option<Decimal>,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub status: PromotionStatus,
}

impl PromotionDraft {
    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank code, a reversed window, or a draft that
    /// carries both a fixed amount and a percentage.
    pub fn build(self) -> Result<Promotion, PromotionError> {
        let discount =
            PromotionDiscount::from_columns(self.discount_amount, self.discount_percentage)?;

        let mut promotion = Promotion::new(
            PromotionCode::parse(&self.code)?,
            discount,
            ValidityWindow::new(self.valid_from, self.valid_until)?,
            self.status,
        );

        promotion.set_description(self.description);

        Ok(promotion)
    }
}

/// New Promotion Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromotion {
    pub uuid: PromotionUuid,
    pub promotion: Promotion,
}

/// Where a looked-up promotion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// The promotion store.
    Store,

    /// The built-in samples, used because the store was unreachable.
    Fallback,
}

/// Result of a code lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionLookup {
    /// Set only for promotions read from the store.
    pub uuid: Option<PromotionUuid>,
    pub promotion: Promotion,
    pub source: LookupSource,
}

impl PromotionLookup {
    pub fn from_store(record: PromotionRecord) -> Self {
        Self {
            uuid: Some(record.uuid),
            promotion: record.promotion,
            source: LookupSource::Store,
        }
    }

    pub fn fallback(promotion: Promotion) -> Self {
        Self {
            uuid: None,
            promotion,
            source: LookupSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == LookupSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::THB};
    use testresult::TestResult;

    use pitchside::discounts::DiscountError;

    use super::*;

    fn draft() -> TestResult<PromotionDraft> {
        Ok(PromotionDraft {
            code: " rainy50 ".to_string(),
            description: Some("Rainy season".to_string()),
            discount_amount: Some(Money::from_minor(5_000, THB)),
            discount_percentage: None,
            valid_from: "2025-06-01T00:00:00Z".parse()?,
            valid_until: "2025-09-30T00:00:00Z".parse()?,
            status: PromotionStatus::Active,
        })
    }

    #[test]
    fn build_uppercases_the_code() -> TestResult {
        let promotion = draft()?.build()?;

        assert_eq!(promotion.code().as_str(), "RAINY50");
        assert_eq!(promotion.display_text(), "off by 50 THB");
        assert_eq!(promotion.description(), Some("Rainy season"));

        Ok(())
    }

    #[test]
    fn build_rejects_two_discount_modes() -> TestResult {
        let mut draft = draft()?;

        draft.discount_percentage = Some(Decimal::from(10));

        assert_eq!(
            draft.build(),
            Err(PromotionError::Discount(DiscountError::AmbiguousDiscount))
        );

        Ok(())
    }

    #[test]
    fn build_rejects_reversed_window() -> TestResult {
        let mut draft = draft()?;

        draft.valid_until = "2025-01-01T00:00:00Z".parse()?;

        assert!(matches!(draft.build(), Err(PromotionError::InvalidWindow { .. })));

        Ok(())
    }
}
