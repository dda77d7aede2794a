//! Field Records

use pitchside::fields::Field;

use crate::uuids::TypedUuid;

/// Field UUID
pub type FieldUuid = TypedUuid<FieldRecord>;

/// Field Record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub uuid: FieldUuid,
    pub field: Field,
}
