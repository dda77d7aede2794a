//! Fields Service

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use pitchside::fields::Field;
use tracing::info;

use crate::{
    domain::fields::{
        FieldsRepository, FieldsServiceError,
        records::{FieldRecord, FieldUuid},
    },
    session::Session,
};

/// Field catalogue over a [`FieldsRepository`]. Reads are public, writes are
/// for administrators.
#[derive(Clone)]
pub struct StoreFieldsService {
    repository: Arc<dyn FieldsRepository>,
}

impl StoreFieldsService {
    #[must_use]
    pub fn new(repository: Arc<dyn FieldsRepository>) -> Self {
        Self { repository }
    }
}

impl std::fmt::Debug for StoreFieldsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreFieldsService").finish_non_exhaustive()
    }
}

#[async_trait]
impl FieldsService for StoreFieldsService {
    async fn list(&self) -> Result<Vec<FieldRecord>, FieldsServiceError> {
        Ok(self.repository.list_fields().await?)
    }

    async fn get(&self, uuid: FieldUuid) -> Result<FieldRecord, FieldsServiceError> {
        Ok(self.repository.get_field(uuid).await?)
    }

    #[tracing::instrument(
        name = "fields.service.create_field",
        skip(self, session, field),
        fields(field_name = %field.name),
        err
    )]
    async fn create(
        &self,
        session: &Session,
        field: Field,
    ) -> Result<FieldRecord, FieldsServiceError> {
        session.require_admin()?;
        field.validate()?;

        let record = self
            .repository
            .insert_field(FieldRecord {
                uuid: FieldUuid::new(),
                field,
            })
            .await?;

        info!(field_uuid = %record.uuid, "created field");

        Ok(record)
    }

    #[tracing::instrument(
        name = "fields.service.update_field",
        skip(self, session, field),
        fields(field_uuid = %uuid),
        err
    )]
    async fn update(
        &self,
        session: &Session,
        uuid: FieldUuid,
        field: Field,
    ) -> Result<FieldRecord, FieldsServiceError> {
        session.require_admin()?;
        field.validate()?;

        let record = self.repository.update_field(uuid, field).await?;

        info!(field_uuid = %uuid, "updated field");

        Ok(record)
    }

    #[tracing::instrument(
        name = "fields.service.toggle_status",
        skip(self, session),
        fields(field_uuid = %uuid),
        err
    )]
    async fn toggle_status(
        &self,
        session: &Session,
        uuid: FieldUuid,
    ) -> Result<FieldRecord, FieldsServiceError> {
        session.require_admin()?;

        let mut field = self.repository.get_field(uuid).await?.field;

        field.status = field.status.toggled();

        let status = field.status;
        let record = self.repository.update_field(uuid, field).await?;

        info!(field_uuid = %uuid, %status, "toggled field status");

        Ok(record)
    }

    #[tracing::instrument(
        name = "fields.service.delete_field",
        skip(self, session),
        fields(field_uuid = %uuid),
        err
    )]
    async fn delete(&self, session: &Session, uuid: FieldUuid) -> Result<(), FieldsServiceError> {
        session.require_admin()?;

        self.repository.delete_field(uuid).await?;

        info!(field_uuid = %uuid, "deleted field");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait FieldsService: Send + Sync {
    /// Every field, ordered by name.
    async fn list(&self) -> Result<Vec<FieldRecord>, FieldsServiceError>;

    async fn get(&self, uuid: FieldUuid) -> Result<FieldRecord, FieldsServiceError>;

    /// Add a field under a fresh id. Administrators only.
    async fn create(
        &self,
        session: &Session,
        field: Field,
    ) -> Result<FieldRecord, FieldsServiceError>;

    /// Replace a field's attributes. Administrators only.
    async fn update(
        &self,
        session: &Session,
        uuid: FieldUuid,
        field: Field,
    ) -> Result<FieldRecord, FieldsServiceError>;

    /// Flip between available and unavailable. Administrators only.
    async fn toggle_status(
        &self,
        session: &Session,
        uuid: FieldUuid,
    ) -> Result<FieldRecord, FieldsServiceError>;

    /// Delete a field. Administrators only.
    async fn delete(&self, session: &Session, uuid: FieldUuid) -> Result<(), FieldsServiceError>;
}

#[cfg(test)]
mod tests {
    use pitchside::fields::{FieldError, FieldStatus};
    use rusty_money::{Money, iso::THB};
    use testresult::TestResult;

    use crate::{
        domain::{
            StoreError,
            fields::{InMemoryFieldsRepository, MockFieldsRepository},
        },
        session::{AccessError, UserUuid},
    };

    use super::*;

    const STADIUM_3: &str = "0190f3a0-0000-7000-8000-000000000003";

    fn service() -> TestResult<StoreFieldsService> {
        Ok(StoreFieldsService::new(Arc::new(
            InMemoryFieldsRepository::samples()?,
        )))
    }

    fn admin() -> Session {
        Session::admin(UserUuid::new())
    }

    fn stadium_5() -> TestResult<Field> {
        Ok(Field::new("Stadium 5", Money::from_minor(9_000, THB))?)
    }

    #[tokio::test]
    async fn admin_creates_a_listed_field() -> TestResult {
        let service = service()?;

        let record = service.create(&admin(), stadium_5()?).await?;

        assert_eq!(service.get(record.uuid).await?.field.name, "Stadium 5");
        assert_eq!(service.list().await?.len(), 6);

        Ok(())
    }

    #[tokio::test]
    async fn writes_are_admin_only() -> TestResult {
        let service = service()?;
        let customer = Session::customer(UserUuid::new());
        let uuid: FieldUuid = STADIUM_3.parse()?;

        let create = service.create(&customer, stadium_5()?).await;
        let toggle = service.toggle_status(&Session::guest(), uuid).await;
        let delete = service.delete(&customer, uuid).await;

        assert!(
            matches!(create, Err(FieldsServiceError::Access(AccessError::AdminRequired))),
            "expected AdminRequired, got {create:?}"
        );
        assert!(
            matches!(toggle, Err(FieldsServiceError::Access(_))),
            "expected an access error, got {toggle:?}"
        );
        assert!(
            matches!(delete, Err(FieldsServiceError::Access(AccessError::AdminRequired))),
            "expected AdminRequired, got {delete:?}"
        );
        assert_eq!(service.list().await?.len(), 5);

        Ok(())
    }

    #[tokio::test]
    async fn toggle_closes_and_reopens_a_field() -> TestResult {
        let service = service()?;
        let uuid: FieldUuid = STADIUM_3.parse()?;

        let closed = service.toggle_status(&admin(), uuid).await?;

        assert_eq!(closed.field.status, FieldStatus::Unavailable);
        assert!(!service.get(uuid).await?.field.is_bookable());

        let reopened = service.toggle_status(&admin(), uuid).await?;

        assert_eq!(reopened.field.status, FieldStatus::Available);

        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_a_negative_rate() -> TestResult {
        let service = service()?;
        let uuid: FieldUuid = STADIUM_3.parse()?;
        let mut field = service.get(uuid).await?.field;

        field.hourly_rate = Money::from_minor(-1, THB);

        let result = service.update(&admin(), uuid, field).await;

        assert!(
            matches!(result, Err(FieldsServiceError::Invalid(FieldError::NegativeRate(_)))),
            "expected NegativeRate, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleting_an_unknown_field_is_not_found() -> TestResult {
        let service = service()?;

        let result = service.delete(&admin(), FieldUuid::new()).await;

        assert!(
            matches!(result, Err(FieldsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_store_is_a_store_error() -> TestResult {
        let mut repository = MockFieldsRepository::new();

        repository
            .expect_insert_field()
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = StoreFieldsService::new(Arc::new(repository));

        let result = service.create(&admin(), stadium_5()?).await;

        assert!(
            matches!(result, Err(FieldsServiceError::Store(StoreError::Unavailable(_)))),
            "expected Store(Unavailable), got {result:?}"
        );

        Ok(())
    }
}
