//! Versioned Schema Mapping
//!
//! Table and column names of the hosted backend, one set per schema version.
//! Every payload is checked against the mapping before it is sent.

use serde_json::Value;
use thiserror::Error;

/// Schema version used when none is configured.
pub const CURRENT_VERSION: u16 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown schema version {0}")]
    UnknownVersion(u16),

    #[error("table {table} lists column {column} more than once")]
    DuplicateColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("table {table} refers to undefined column {column}")]
    UndefinedColumn {
        table: &'static str,
        column: &'static str,
    },

    /// The payload names a column the table does not have.
    #[error("table {table} has no column {field}")]
    UnsupportedField { table: &'static str, field: String },

    /// The payload sets a column the backend fills in itself.
    #[error("column {table}.{field} is generated by the backend")]
    GeneratedField { table: &'static str, field: String },

    #[error("table {table} requires a value for {column}")]
    MissingField {
        table: &'static str,
        column: &'static str,
    },

    #[error("payload for {0} is not an object")]
    NotAnObject(&'static str),

    /// One `bookings` row spans a single interval.
    #[error("slots must be contiguous to be stored as one booking")]
    NonContiguousSlots,
}

/// One backend table.
#[derive(Debug, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub key: &'static str,
    columns: &'static [&'static str],
    required: &'static [&'static str],
    generated: &'static [&'static str],
}

impl Table {
    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    /// Comma separated column list for `select=`.
    pub fn select(&self) -> String {
        self.columns.join(",")
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for (index, column) in self.columns.iter().enumerate() {
            if self.columns.iter().skip(index + 1).any(|other| other == column) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name,
                    column: *column,
                });
            }
        }

        let referenced = std::iter::once(&self.key)
            .chain(self.required)
            .chain(self.generated);

        for column in referenced {
            if !self.has_column(column) {
                return Err(SchemaError::UndefinedColumn {
                    table: self.name,
                    column: *column,
                });
            }
        }

        Ok(())
    }

    fn check_fields(&self, payload: &Value) -> Result<(), SchemaError> {
        let object = payload.as_object().ok_or(SchemaError::NotAnObject(self.name))?;

        for field in object.keys() {
            if !self.has_column(field) {
                return Err(SchemaError::UnsupportedField {
                    table: self.name,
                    field: field.clone(),
                });
            }

            if self.generated.contains(&field.as_str()) {
                return Err(SchemaError::GeneratedField {
                    table: self.name,
                    field: field.clone(),
                });
            }
        }

        Ok(())
    }

    /// Check an insert payload: known, writable columns and every required one set.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_insert(&self, payload: &Value) -> Result<(), SchemaError> {
        self.check_fields(payload)?;

        for column in self.required {
            if payload.get(column).is_none_or(Value::is_null) {
                return Err(SchemaError::MissingField {
                    table: self.name,
                    column: *column,
                });
            }
        }

        Ok(())
    }

    /// Check an update payload: known, writable columns only.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_update(&self, payload: &Value) -> Result<(), SchemaError> {
        self.check_fields(payload)
    }
}

/// Table mapping of one schema version.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub version: u16,
    pub promotions: Table,
    pub fields: Table,
    pub bookings: Table,
}

static V1: Schema = Schema {
    version: 1,
    promotions: Table {
        name: "promotions",
        key: "id",
        columns: &[
            "id",
            "name",
            "description",
            "discount_percentage",
            "discount_amount",
            "valid_from",
            "valid_until",
            "status",
            "created_at",
            "updated_at",
        ],
        required: &["id", "name", "valid_from", "valid_until", "status"],
        generated: &["created_at", "updated_at"],
    },
    fields: Table {
        name: "fields",
        key: "id",
        columns: &[
            "id",
            "name",
            "description",
            "location",
            "price",
            "size",
            "surface",
            "image_url",
            "status",
        ],
        required: &["id", "name", "price", "status"],
        generated: &[],
    },
    bookings: Table {
        name: "bookings",
        key: "id",
        columns: &[
            "id",
            "user_id",
            "field_id",
            "start_time",
            "end_time",
            "status",
            "payment_status",
            "promotion_id",
            "total_price",
            "created_at",
        ],
        required: &[
            "id",
            "user_id",
            "field_id",
            "start_time",
            "end_time",
            "status",
            "payment_status",
            "total_price",
        ],
        generated: &["created_at"],
    },
};

impl Schema {
    /// Mapping for `version`, validated.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownVersion`] for versions without a mapping,
    /// or the first inconsistency inside the mapping.
    pub fn for_version(version: u16) -> Result<&'static Self, SchemaError> {
        let schema = match version {
            1 => &V1,
            other => return Err(SchemaError::UnknownVersion(other)),
        };

        schema.validate()?;

        Ok(schema)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        self.promotions.validate()?;
        self.fields.validate()?;
        self.bookings.validate()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn current_version_is_consistent() -> TestResult {
        let schema = Schema::for_version(CURRENT_VERSION)?;

        assert_eq!(schema.version, CURRENT_VERSION);
        assert!(schema.bookings.has_column("promotion_id"));

        Ok(())
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert_eq!(Schema::for_version(7), Err(SchemaError::UnknownVersion(7)));
    }

    #[test]
    fn duplicate_columns_are_caught() {
        let table = Table {
            name: "t",
            key: "id",
            columns: &["id", "name", "name"],
            required: &[],
            generated: &[],
        };

        assert_eq!(
            table.validate(),
            Err(SchemaError::DuplicateColumn {
                table: "t",
                column: "name"
            })
        );
    }

    #[test]
    fn insert_with_unknown_column_is_rejected() -> TestResult {
        let schema = Schema::for_version(1)?;
        let payload = json!({
            "id": "0190f3a0-0000-7000-8000-000000000001",
            "name": "SUMMER200",
            "code": "SUMMER200",
            "valid_from": "2025-01-01T00:00:00Z",
            "valid_until": "2026-12-31T00:00:00Z",
            "status": "active"
        });

        assert_eq!(
            schema.promotions.check_insert(&payload),
            Err(SchemaError::UnsupportedField {
                table: "promotions",
                field: "code".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn insert_without_required_column_is_rejected() -> TestResult {
        let schema = Schema::for_version(1)?;
        let payload = json!({ "id": "x", "name": "SUMMER200", "status": "active", "valid_from": null });

        assert!(matches!(
            schema.promotions.check_insert(&payload),
            Err(SchemaError::MissingField { column: "valid_from", .. })
        ));

        Ok(())
    }

    #[test]
    fn update_may_not_set_generated_columns() -> TestResult {
        let schema = Schema::for_version(1)?;
        let payload = json!({ "status": "confirmed", "created_at": "2025-01-01T00:00:00Z" });

        assert!(matches!(
            schema.bookings.check_update(&payload),
            Err(SchemaError::GeneratedField { .. })
        ));
        assert!(schema.bookings.check_update(&json!({ "status": "confirmed" })).is_ok());

        Ok(())
    }
}
