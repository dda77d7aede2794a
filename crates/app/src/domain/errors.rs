//! Store errors shared by every repository.

use thiserror::Error;

use crate::backend::schema::SchemaError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record not found")]
    NotFound,

    /// A uniqueness rule was violated.
    #[error("conflicting record: {0}")]
    Conflict(String),

    #[error("unexpected response from store: {0}")]
    UnexpectedResponse(String),

    /// A stored row could not be turned into a domain value.
    #[error("invalid stored data: {0}")]
    Decode(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors raised while seeding in-memory stores from fixtures.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Fixture(#[from] pitchside::fixtures::FixtureError),

    #[error("fixture key {key} is not a uuid")]
    InvalidKey {
        key: String,
        #[source]
        source: uuid::Error,
    },
}
