//! Promotions Records

use jiff::Timestamp;
use pitchside::promotions::Promotion;

use crate::uuids::TypedUuid;

/// Promotion UUID
pub type PromotionUuid = TypedUuid<PromotionRecord>;

/// Promotion Record
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRecord {
    pub uuid: PromotionUuid,
    pub promotion: Promotion,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
