//! Record ids.
//!
//! Every stored record is keyed by a v7 UUID. The type parameter names the
//! record, so a field id cannot be passed where a booking id is expected.
//! On the wire an id is plain UUID text.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A v7 UUID tagged with the record type it identifies.
pub struct TypedUuid<Record> {
    uuid: Uuid,
    record: PhantomData<fn() -> Record>,
}

impl<Record> TypedUuid<Record> {
    /// Fresh time-ordered id.
    #[must_use]
    pub fn new() -> Self {
        Self::tagged(Uuid::now_v7())
    }

    const fn tagged(uuid: Uuid) -> Self {
        Self {
            uuid,
            record: PhantomData,
        }
    }
}

impl<Record> Default for TypedUuid<Record> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Record> Clone for TypedUuid<Record> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Record> Copy for TypedUuid<Record> {}

impl<Record> PartialEq for TypedUuid<Record> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<Record> Eq for TypedUuid<Record> {}

impl<Record> PartialOrd for TypedUuid<Record> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Record> Ord for TypedUuid<Record> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}

impl<Record> Hash for TypedUuid<Record> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<Record> fmt::Display for TypedUuid<Record> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uuid, f)
    }
}

impl<Record> fmt::Debug for TypedUuid<Record> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Accepts surrounding whitespace, as pasted on the command line.
impl<Record> FromStr for TypedUuid<Record> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self::tagged)
    }
}

impl<Record> Serialize for TypedUuid<Record> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.uuid.serialize(serializer)
    }
}

impl<'de, Record> Deserialize<'de> for TypedUuid<Record> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::tagged)
    }
}
