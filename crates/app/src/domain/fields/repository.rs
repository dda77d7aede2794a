//! Fields repository.

use async_trait::async_trait;
use mockall::automock;
use pitchside::{fields::Field, fixtures::sample_fields, money::Amount};
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::{
    SeedError, StoreError,
    fields::records::{FieldRecord, FieldUuid},
};

#[automock]
#[async_trait]
pub trait FieldsRepository: Send + Sync {
    /// Every field, ordered by name.
    async fn list_fields(&self) -> Result<Vec<FieldRecord>, StoreError>;

    /// A single field.
    async fn get_field(&self, field: FieldUuid) -> Result<FieldRecord, StoreError>;

    /// Current price of one hour on `field`.
    async fn hourly_rate(&self, field: FieldUuid) -> Result<Amount, StoreError>;

    async fn insert_field(&self, record: FieldRecord) -> Result<FieldRecord, StoreError>;

    /// Replace the attributes of an existing field.
    async fn update_field(&self, uuid: FieldUuid, field: Field) -> Result<FieldRecord, StoreError>;

    async fn delete_field(&self, uuid: FieldUuid) -> Result<(), StoreError>;
}

/// Fields held in memory, seeded from fixtures.
#[derive(Debug, Default)]
pub struct InMemoryFieldsRepository {
    fields: RwLock<FxHashMap<FieldUuid, FieldRecord>>,
}

impl InMemoryFieldsRepository {
    pub fn with_fields(records: impl IntoIterator<Item = FieldRecord>) -> Self {
        Self {
            fields: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.uuid, record))
                    .collect(),
            ),
        }
    }

    /// Repository holding the built-in sample fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture is invalid.
    pub fn samples() -> Result<Self, SeedError> {
        let records = sample_fields()?
            .into_iter()
            .map(|(key, field)| match key.parse::<FieldUuid>() {
                Ok(uuid) => Ok(FieldRecord { uuid, field }),
                Err(source) => Err(SeedError::InvalidKey { key, source }),
            })
            .collect::<Result<Vec<_>, SeedError>>()?;

        Ok(Self::with_fields(records))
    }
}

#[async_trait]
impl FieldsRepository for InMemoryFieldsRepository {
    async fn list_fields(&self) -> Result<Vec<FieldRecord>, StoreError> {
        let fields = self.fields.read().await;

        let mut records: Vec<FieldRecord> = fields.values().cloned().collect();

        records.sort_by(|a, b| a.field.name.cmp(&b.field.name));

        Ok(records)
    }

    async fn get_field(&self, field: FieldUuid) -> Result<FieldRecord, StoreError> {
        self.fields
            .read()
            .await
            .get(&field)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn hourly_rate(&self, field: FieldUuid) -> Result<Amount, StoreError> {
        Ok(self.get_field(field).await?.field.hourly_rate)
    }

    async fn insert_field(&self, record: FieldRecord) -> Result<FieldRecord, StoreError> {
        let mut fields = self.fields.write().await;

        if fields.contains_key(&record.uuid) {
            return Err(StoreError::Conflict(format!("uuid {} is taken", record.uuid)));
        }

        fields.insert(record.uuid, record.clone());

        Ok(record)
    }

    async fn update_field(&self, uuid: FieldUuid, field: Field) -> Result<FieldRecord, StoreError> {
        let mut fields = self.fields.write().await;
        let record = fields.get_mut(&uuid).ok_or(StoreError::NotFound)?;

        record.field = field;

        Ok(record.clone())
    }

    async fn delete_field(&self, uuid: FieldUuid) -> Result<(), StoreError> {
        self.fields
            .write()
            .await
            .remove(&uuid)
            .map(|_record| ())
            .ok_or(StoreError::NotFound)
    }
}
