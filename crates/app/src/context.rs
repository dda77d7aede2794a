//! App Context

use std::sync::Arc;

use pitchside::fixtures::{FixtureError, sample_promotions};
use thiserror::Error;
use tracing::info;

use crate::{
    backend::rest::{RestBackend, RestConfig, RestInitError},
    config::{AppConfig, ConfigError},
    domain::{
        SeedError,
        bookings::{
            BookingsRepository, BookingsService, InMemoryBookingsRepository, StoreBookingsService,
        },
        fields::{
            FieldsRepository, FieldsService, InMemoryFieldsRepository, StoreFieldsService,
        },
        promotions::{
            InMemoryPromotionsStore, PromotionsService, PromotionsStore, StorePromotionsService,
        },
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load sample data: {0}")]
    Seed(#[from] SeedError),

    #[error("failed to load fallback promotions: {0}")]
    Fallback(#[from] FixtureError),

    #[error("failed to set up backend client: {0}")]
    Backend(#[from] RestInitError),
}

struct Stores {
    promotions: Arc<dyn PromotionsStore>,
    fields: Arc<dyn FieldsRepository>,
    bookings: Arc<dyn BookingsRepository>,
}

/// Services shared by every command.
#[derive(Clone)]
pub struct AppContext {
    pub promotions: Arc<dyn PromotionsService>,
    pub bookings: Arc<dyn BookingsService>,
    pub fields: Arc<dyn FieldsService>,
}

impl AppContext {
    /// Build the context from configuration: the hosted backend when a URL is
    /// configured, otherwise in-memory stores seeded with the sample data.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration, unreadable sample data, or
    /// an unusable backend schema version.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let currency = config.pricing.currency()?;
        let opening_hours = config.pricing.opening_hours()?;
        let time_zone = config.pricing.time_zone()?;

        let stores = match &config.backend.url {
            Some(base_url) => {
                let api_key = config
                    .backend
                    .api_key
                    .clone()
                    .ok_or(ConfigError::MissingApiKey)?;

                let backend = Arc::new(RestBackend::new(
                    RestConfig {
                        base_url: base_url.clone(),
                        api_key,
                        timeout: config.backend.timeout(),
                        currency,
                        time_zone: time_zone.clone(),
                    },
                    config.backend.schema_version,
                )?);

                info!(url = %base_url, "using hosted backend");

                Stores {
                    promotions: backend.clone(),
                    fields: backend.clone(),
                    bookings: backend,
                }
            }
            None => {
                info!("using in-memory sample data");

                Stores {
                    promotions: Arc::new(InMemoryPromotionsStore::samples()?),
                    fields: Arc::new(InMemoryFieldsRepository::samples()?),
                    bookings: Arc::new(InMemoryBookingsRepository::new()),
                }
            }
        };

        let promotions: Arc<dyn PromotionsService> =
            Arc::new(StorePromotionsService::new(stores.promotions, sample_promotions()?));

        let bookings = Arc::new(StoreBookingsService::new(
            stores.fields.clone(),
            stores.bookings,
            promotions.clone(),
            opening_hours,
            time_zone,
        ));

        Ok(Self {
            promotions,
            bookings,
            fields: Arc::new(StoreFieldsService::new(stores.fields)),
        })
    }
}
