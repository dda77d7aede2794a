//! Promotions Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pitchside::promotions::{Promotion, PromotionCode};
use tracing::{info, warn};

use crate::{
    domain::{
        StoreError,
        promotions::{
            PromotionsServiceError, PromotionsStore,
            data::{NewPromotion, PromotionLookup},
            records::{PromotionRecord, PromotionUuid},
        },
    },
    session::Session,
};

/// Promotions service backed by a [`PromotionsStore`].
///
/// When the store cannot be reached, code lookups fall back to a fixed set of
/// promotions and flag the result as [`LookupSource::Fallback`].
///
/// [`LookupSource::Fallback`]: crate::domain::promotions::data::LookupSource::Fallback
#[derive(Clone)]
pub struct StorePromotionsService {
    store: Arc<dyn PromotionsStore>,
    fallback: Arc<[Promotion]>,
}

impl StorePromotionsService {
    #[must_use]
    pub fn new(store: Arc<dyn PromotionsStore>, fallback: Vec<Promotion>) -> Self {
        Self {
            store,
            fallback: fallback.into(),
        }
    }

    fn search_fallback(&self, code: &PromotionCode) -> Option<Promotion> {
        self.fallback
            .iter()
            .find(|promotion| promotion.code() == code)
            .cloned()
    }
}

impl std::fmt::Debug for StorePromotionsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorePromotionsService")
            .field("fallback", &self.fallback.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PromotionsService for StorePromotionsService {
    #[tracing::instrument(
        name = "promotions.service.search_by_code",
        skip(self),
        fields(source = tracing::field::Empty),
        err
    )]
    async fn search_by_code(&self, code: &str) -> Result<PromotionLookup, PromotionsServiceError> {
        let code = PromotionCode::parse(code)?;

        let lookup = match self.store.find_by_code(&code).await {
            Ok(Some(record)) => PromotionLookup::from_store(record),
            Ok(None) => return Err(PromotionsServiceError::NotFound),
            Err(StoreError::Unavailable(reason)) => {
                warn!(%code, %reason, "promotion store unavailable, using fallback promotions");

                self.search_fallback(&code)
                    .map(PromotionLookup::fallback)
                    .ok_or(PromotionsServiceError::NotFound)?
            }
            Err(error) => return Err(error.into()),
        };

        tracing::Span::current().record("source", tracing::field::debug(lookup.source));

        Ok(lookup)
    }

    #[tracing::instrument(name = "promotions.service.apply_code", skip(self), err)]
    async fn apply_code(
        &self,
        code: &str,
        now: Timestamp,
    ) -> Result<PromotionLookup, PromotionsServiceError> {
        let lookup = self.search_by_code(code).await?;

        if !lookup.promotion.is_valid(now) {
            return Err(PromotionsServiceError::ExpiredOrInactive(
                lookup.promotion.code().clone(),
            ));
        }

        Ok(lookup)
    }

    async fn list_active(
        &self,
        now: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError> {
        Ok(self.store.list_active(now).await?)
    }

    async fn list(&self, session: &Session) -> Result<Vec<PromotionRecord>, PromotionsServiceError> {
        session.require_admin()?;

        Ok(self.store.list().await?)
    }

    async fn get(
        &self,
        session: &Session,
        uuid: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        session.require_admin()?;

        Ok(self.store.get(uuid).await?)
    }

    #[tracing::instrument(
        name = "promotions.service.create_promotion",
        skip(self, session, promotion),
        fields(
            promotion_uuid = %promotion.uuid,
            code = %promotion.promotion.code()
        ),
        err
    )]
    async fn create(
        &self,
        session: &Session,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        session.require_admin()?;

        let record = self.store.insert(promotion).await?;

        info!(promotion_uuid = %record.uuid, "created promotion");

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.update_promotion",
        skip(self, session, promotion),
        fields(promotion_uuid = %uuid),
        err
    )]
    async fn update(
        &self,
        session: &Session,
        uuid: PromotionUuid,
        promotion: Promotion,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        session.require_admin()?;

        let record = self.store.update(uuid, promotion).await?;

        info!(promotion_uuid = %uuid, "updated promotion");

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.toggle_status",
        skip(self, session),
        fields(promotion_uuid = %uuid),
        err
    )]
    async fn toggle_status(
        &self,
        session: &Session,
        uuid: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        session.require_admin()?;

        let mut promotion = self.store.get(uuid).await?.promotion;
        let status = promotion.status().toggled();

        promotion.set_status(status);

        let record = self.store.update(uuid, promotion).await?;

        info!(promotion_uuid = %uuid, %status, "toggled promotion status");

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.delete_promotion",
        skip(self, session),
        fields(promotion_uuid = %uuid),
        err
    )]
    async fn delete(
        &self,
        session: &Session,
        uuid: PromotionUuid,
    ) -> Result<(), PromotionsServiceError> {
        session.require_admin()?;

        self.store.delete(uuid).await?;

        info!(promotion_uuid = %uuid, "deleted promotion");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Find a promotion by code, case-insensitively. Validity is not checked.
    async fn search_by_code(&self, code: &str) -> Result<PromotionLookup, PromotionsServiceError>;

    /// Find a promotion by code and require it to be usable at `now`.
    async fn apply_code(
        &self,
        code: &str,
        now: Timestamp,
    ) -> Result<PromotionLookup, PromotionsServiceError>;

    /// Promotions usable at `now`, as offered on the booking page.
    async fn list_active(
        &self,
        now: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError>;

    /// Every promotion. Administrators only.
    async fn list(&self, session: &Session) -> Result<Vec<PromotionRecord>, PromotionsServiceError>;

    /// A single promotion. Administrators only.
    async fn get(
        &self,
        session: &Session,
        uuid: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Create a promotion. Administrators only.
    async fn create(
        &self,
        session: &Session,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Replace a promotion. Administrators only.
    async fn update(
        &self,
        session: &Session,
        uuid: PromotionUuid,
        promotion: Promotion,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Flip between active and inactive. Administrators only.
    async fn toggle_status(
        &self,
        session: &Session,
        uuid: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Delete a promotion. Administrators only.
    async fn delete(&self, session: &Session, uuid: PromotionUuid)
    -> Result<(), PromotionsServiceError>;
}

#[cfg(test)]
mod tests {
    use pitchside::{
        fixtures::sample_promotions,
        promotions::{PromotionStatus, ValidityWindow},
    };
    use testresult::TestResult;

    use crate::{
        domain::promotions::{
            InMemoryPromotionsStore, MockPromotionsStore, data::LookupSource,
        },
        session::{AccessError, UserUuid},
    };

    use super::*;

    fn now() -> TestResult<Timestamp> {
        Ok("2025-06-01T12:00:00Z".parse()?)
    }

    fn service(store: impl PromotionsStore + 'static) -> TestResult<StorePromotionsService> {
        Ok(StorePromotionsService::new(
            Arc::new(store),
            sample_promotions()?,
        ))
    }

    fn admin() -> Session {
        Session::admin(UserUuid::new())
    }

    fn unavailable_store() -> MockPromotionsStore {
        let mut store = MockPromotionsStore::new();

        store
            .expect_find_by_code()
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        store
    }

    #[tokio::test]
    async fn search_normalises_the_code() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;

        let lookup = service.search_by_code("  summer200 ").await?;

        assert_eq!(lookup.promotion.code().as_str(), "SUMMER200");
        assert_eq!(lookup.source, LookupSource::Store);
        assert!(lookup.uuid.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn search_unknown_code_is_not_found() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;

        let result = service.search_by_code("NOPE").await;

        assert!(
            matches!(result, Err(PromotionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_blank_code_is_invalid() -> TestResult {
        let service = service(InMemoryPromotionsStore::new())?;

        let result = service.search_by_code("   ").await;

        assert!(
            matches!(result, Err(PromotionsServiceError::Invalid(_))),
            "expected Invalid, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_code_in_reachable_store_does_not_fall_back() -> TestResult {
        let mut store = MockPromotionsStore::new();

        store.expect_find_by_code().returning(|_| Ok(None));

        let result = service(store)?.search_by_code("SUMMER200").await;

        assert!(
            matches!(result, Err(PromotionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_store_falls_back_with_provenance() -> TestResult {
        let lookup = service(unavailable_store())?
            .search_by_code("welcome20")
            .await?;

        assert!(lookup.is_fallback());
        assert_eq!(lookup.uuid, None);
        assert_eq!(lookup.promotion.display_text(), "off by 20%");

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_store_and_unknown_code_is_not_found() -> TestResult {
        let result = service(unavailable_store())?.search_by_code("NOPE").await;

        assert!(
            matches!(result, Err(PromotionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_store_errors_propagate() -> TestResult {
        let mut store = MockPromotionsStore::new();

        store
            .expect_find_by_code()
            .returning(|_| Err(StoreError::Decode("bad row".to_string())));

        let result = service(store)?.search_by_code("SUMMER200").await;

        assert!(
            matches!(result, Err(PromotionsServiceError::Store(StoreError::Decode(_)))),
            "expected Store(Decode), got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn apply_expired_code_is_distinct_from_not_found() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;

        let result = service.apply_code("EXPIRED2024", now()?).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::ExpiredOrInactive(ref code)) if code.as_str() == "EXPIRED2024"),
            "expected ExpiredOrInactive, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn apply_valid_code_returns_promotion() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;

        let lookup = service.apply_code("vipuser500", now()?).await?;

        assert_eq!(lookup.promotion.display_text(), "off by 500 THB");

        Ok(())
    }

    #[tokio::test]
    async fn customers_cannot_manage_promotions() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;
        let session = Session::customer(UserUuid::new());

        let result = service.list(&session).await;

        assert!(
            matches!(
                result,
                Err(PromotionsServiceError::Access(AccessError::AdminRequired))
            ),
            "expected AdminRequired, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_duplicate_code_returns_already_exists() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;
        let promotion = Promotion::new(
            PromotionCode::parse("summer200")?,
            None,
            ValidityWindow::parse("2025-01-01", "2025-12-31")?,
            PromotionStatus::Active,
        );

        let result = service
            .create(
                &admin(),
                NewPromotion {
                    uuid: PromotionUuid::new(),
                    promotion,
                },
            )
            .await;

        assert!(
            matches!(result, Err(PromotionsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn toggle_status_flips_and_blocks_application() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;
        let uuid = service
            .search_by_code("SUMMER200")
            .await?
            .uuid
            .ok_or("store lookup without uuid")?;

        let record = service.toggle_status(&admin(), uuid).await?;

        assert_eq!(record.promotion.status(), PromotionStatus::Inactive);

        let result = service.apply_code("SUMMER200", now()?).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::ExpiredOrInactive(_))),
            "expected ExpiredOrInactive, got {result:?}"
        );

        let record = service.toggle_status(&admin(), uuid).await?;

        assert_eq!(record.promotion.status(), PromotionStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_promotion_is_not_found() -> TestResult {
        let service = service(InMemoryPromotionsStore::samples()?)?;

        let result = service.delete(&admin(), PromotionUuid::new()).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
