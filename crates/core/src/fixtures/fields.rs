//! Field Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fields::{Field, FieldStatus},
    fixtures::{FixtureError, SAMPLE_FIELDS},
    money::parse_price,
};

/// Wrapper for fields in YAML
#[derive(Debug, Deserialize)]
pub struct FieldsFixture {
    /// Map of field id -> field fixture
    pub fields: FxHashMap<String, FieldFixture>,
}

impl FieldsFixture {
    /// Build every field with its key, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry's error.
    pub fn into_fields(self) -> Result<Vec<(String, Field)>, FixtureError> {
        let mut fields = self
            .fields
            .into_iter()
            .map(|(key, fixture)| Ok((key, Field::try_from(fixture)?)))
            .collect::<Result<Vec<_>, FixtureError>>()?;

        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        Ok(fields)
    }
}

/// Field fixture from YAML
#[derive(Debug, Deserialize)]
pub struct FieldFixture {
    /// Display name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Location
    #[serde(default)]
    pub location: String,

    /// Hourly rate (e.g., "50 THB")
    pub hourly_rate: String,

    /// Format
    #[serde(default)]
    pub size: String,

    /// Surface
    #[serde(default)]
    pub surface: String,

    /// `available` or `unavailable`
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<FieldFixture> for Field {
    type Error = FixtureError;

    fn try_from(fixture: FieldFixture) -> Result<Self, Self::Error> {
        let status = fixture
            .status
            .as_deref()
            .map(str::parse::<FieldStatus>)
            .transpose()?
            .unwrap_or_default();

        let mut field = Field::new(fixture.name, parse_price(&fixture.hourly_rate)?)?;

        field.description = fixture.description;
        field.location = fixture.location;
        field.size = fixture.size;
        field.surface = fixture.surface;
        field.status = status;

        Ok(field)
    }
}

/// The built-in sample fields keyed by id, ordered by id.
///
/// # Errors
///
/// Returns an error if the embedded fixture is invalid.
pub fn sample_fields() -> Result<Vec<(String, Field)>, FixtureError> {
    let fixture: FieldsFixture = serde_norway::from_str(SAMPLE_FIELDS)?;

    fixture.into_fields()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::THB};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn samples_include_five_bookable_fields() -> TestResult {
        let fields = sample_fields()?;

        assert_eq!(fields.len(), 5);
        assert!(fields.iter().all(|(_, field)| field.is_bookable()));

        Ok(())
    }

    #[test]
    fn sample_rates_are_in_baht() -> TestResult {
        let rates: Vec<_> = sample_fields()?
            .into_iter()
            .map(|(_, field)| field.hourly_rate)
            .collect();

        assert_eq!(rates.first(), Some(&Money::from_minor(5_000, THB)));
        assert!(rates.iter().all(|rate| rate.currency() == THB));

        Ok(())
    }

    #[test]
    fn field_fixture_rejects_unknown_status() {
        let fixture = FieldFixture {
            name: "Hall".to_string(),
            description: String::new(),
            location: String::new(),
            hourly_rate: "10 THB".to_string(),
            size: String::new(),
            surface: String::new(),
            status: Some("demolished".to_string()),
        };

        assert!(matches!(Field::try_from(fixture), Err(FixtureError::Field(_))));
    }
}
