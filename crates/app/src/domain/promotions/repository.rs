//! Promotions store.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pitchside::{
    fixtures::sample_promotions,
    promotions::{Promotion, PromotionCode},
};
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::{
    SeedError, StoreError,
    promotions::{
        data::NewPromotion,
        records::{PromotionRecord, PromotionUuid},
    },
};

#[automock]
#[async_trait]
pub trait PromotionsStore: Send + Sync {
    /// Exact match on the normalised code; `None` when no record has it.
    async fn find_by_code(
        &self,
        code: &PromotionCode,
    ) -> Result<Option<PromotionRecord>, StoreError>;

    async fn get(&self, uuid: PromotionUuid) -> Result<PromotionRecord, StoreError>;

    /// Every promotion, ordered by code.
    async fn list(&self) -> Result<Vec<PromotionRecord>, StoreError>;

    /// Promotions usable at `now`, ordered by code.
    async fn list_active(&self, now: Timestamp) -> Result<Vec<PromotionRecord>, StoreError>;

    async fn insert(&self, promotion: NewPromotion) -> Result<PromotionRecord, StoreError>;

    /// Replace the promotion held under `uuid`.
    async fn update(
        &self,
        uuid: PromotionUuid,
        promotion: Promotion,
    ) -> Result<PromotionRecord, StoreError>;

    async fn delete(&self, uuid: PromotionUuid) -> Result<(), StoreError>;
}

/// Promotions held in memory. Codes are unique.
#[derive(Debug, Default)]
pub struct InMemoryPromotionsStore {
    records: RwLock<FxHashMap<PromotionUuid, PromotionRecord>>,
}

impl InMemoryPromotionsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the built-in sample promotions.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture is invalid.
    pub fn samples() -> Result<Self, SeedError> {
        let now = Timestamp::now();

        let records = sample_promotions()?
            .into_iter()
            .map(|promotion| {
                let record = PromotionRecord {
                    uuid: PromotionUuid::new(),
                    promotion,
                    created_at: now,
                    updated_at: now,
                };

                (record.uuid, record)
            })
            .collect();

        Ok(Self {
            records: RwLock::new(records),
        })
    }
}

fn sorted(mut records: Vec<PromotionRecord>) -> Vec<PromotionRecord> {
    records.sort_by(|a, b| a.promotion.code().cmp(b.promotion.code()));
    records
}

fn ensure_code_free(
    records: &FxHashMap<PromotionUuid, PromotionRecord>,
    code: &PromotionCode,
    except: Option<PromotionUuid>,
) -> Result<(), StoreError> {
    let taken = records
        .values()
        .any(|record| record.promotion.code() == code && Some(record.uuid) != except);

    if taken {
        return Err(StoreError::Conflict(format!("code {code} is taken")));
    }

    Ok(())
}

#[async_trait]
impl PromotionsStore for InMemoryPromotionsStore {
    async fn find_by_code(
        &self,
        code: &PromotionCode,
    ) -> Result<Option<PromotionRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|record| record.promotion.code() == code)
            .cloned())
    }

    async fn get(&self, uuid: PromotionUuid) -> Result<PromotionRecord, StoreError> {
        self.records
            .read()
            .await
            .get(&uuid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<PromotionRecord>, StoreError> {
        Ok(sorted(self.records.read().await.values().cloned().collect()))
    }

    async fn list_active(&self, now: Timestamp) -> Result<Vec<PromotionRecord>, StoreError> {
        Ok(sorted(
            self.records
                .read()
                .await
                .values()
                .filter(|record| record.promotion.is_valid(now))
                .cloned()
                .collect(),
        ))
    }

    async fn insert(&self, promotion: NewPromotion) -> Result<PromotionRecord, StoreError> {
        let mut records = self.records.write().await;

        if records.contains_key(&promotion.uuid) {
            return Err(StoreError::Conflict(format!("uuid {} is taken", promotion.uuid)));
        }

        ensure_code_free(&records, promotion.promotion.code(), None)?;

        let now = Timestamp::now();
        let record = PromotionRecord {
            uuid: promotion.uuid,
            promotion: promotion.promotion,
            created_at: now,
            updated_at: now,
        };

        records.insert(record.uuid, record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        uuid: PromotionUuid,
        promotion: Promotion,
    ) -> Result<PromotionRecord, StoreError> {
        let mut records = self.records.write().await;

        ensure_code_free(&records, promotion.code(), Some(uuid))?;

        let record = records.get_mut(&uuid).ok_or(StoreError::NotFound)?;

        record.promotion = promotion;
        record.updated_at = Timestamp::now();

        Ok(record.clone())
    }

    async fn delete(&self, uuid: PromotionUuid) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .remove(&uuid)
            .map(|_record| ())
            .ok_or(StoreError::NotFound)
    }
}
