//! Application configuration

use clap::Args;
use thiserror::Error;

pub mod backend;
pub mod logging;
pub mod pricing;

pub use backend::BackendConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use pricing::PricingConfig;

/// Errors raised while interpreting configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    #[error("invalid opening hours: {0}")]
    OpeningHours(#[from] pitchside::slots::SlotError),

    #[error("utc offset {0} is out of range")]
    UtcOffset(i8),

    #[error("backend url is set but no api key was given")]
    MissingApiKey,
}

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Hosted backend settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Pricing and opening hours.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
