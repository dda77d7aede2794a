//! Backend Config

use std::time::Duration;

use clap::Args;

use crate::backend::schema::CURRENT_VERSION;

/// Hosted backend settings. Without a URL the sample data is served from
/// memory.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Backend project URL
    #[arg(long = "backend-url", env = "PITCHSIDE_BACKEND_URL", global = true)]
    pub url: Option<String>,

    /// Backend API key
    #[arg(
        long = "backend-api-key",
        env = "PITCHSIDE_BACKEND_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long = "backend-timeout",
        env = "PITCHSIDE_BACKEND_TIMEOUT",
        default_value_t = 10,
        global = true
    )]
    pub timeout_secs: u64,

    /// Version of the backend's table layout
    #[arg(
        long = "schema-version",
        env = "PITCHSIDE_SCHEMA_VERSION",
        default_value_t = CURRENT_VERSION,
        global = true
    )]
    pub schema_version: u16,
}

impl BackendConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
