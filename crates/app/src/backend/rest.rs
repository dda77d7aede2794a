//! REST client for the hosted backend.
//!
//! Talks to a PostgREST style API under `/rest/v1/<table>`, authenticating
//! every request with the project API key.

use std::time::Duration;

use async_trait::async_trait;
use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use pitchside::{
    discounts::PromotionDiscount,
    fields::{Field, FieldStatus},
    money::{Amount, amount_from_decimal, major_units},
    promotions::{Promotion, PromotionCode, PromotionStatus, ValidityWindow},
    slots::{SlotSelection, TimeSlot},
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::{
    backend::schema::{Schema, SchemaError, Table},
    domain::{
        StoreError,
        bookings::{
            BookingsRepository,
            data::NewBooking,
            records::{BookingRecord, BookingStatus, BookingUuid, PaymentStatus},
        },
        fields::{
            FieldsRepository,
            records::{FieldRecord, FieldUuid},
        },
        promotions::{
            PromotionsStore,
            data::NewPromotion,
            records::{PromotionRecord, PromotionUuid},
        },
    },
    session::UserUuid,
};

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `"https://example.supabase.co"`.
    pub base_url: String,

    /// Project API key, sent as `apikey` and bearer token.
    pub api_key: String,

    pub timeout: Duration,

    /// Currency of every stored amount.
    pub currency: &'static Currency,

    /// Time zone the facility's opening hours are expressed in.
    pub time_zone: TimeZone,
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("currency", &self.currency.iso_alpha_code)
            .field("time_zone", &self.time_zone)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum RestInitError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Decode(error.to_string());
        }

        Self::Unavailable(error.to_string())
    }
}

/// Store implementation over the hosted backend's REST API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    config: RestConfig,
    schema: &'static Schema,
    http: Client,
}

impl RestBackend {
    /// Create a client for the given schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema version is unknown or inconsistent, or
    /// if the HTTP client cannot be built.
    pub fn new(config: RestConfig, schema_version: u16) -> Result<Self, RestInitError> {
        let schema = Schema::for_version(schema_version)?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            schema,
            http,
        })
    }

    fn url(&self, table: &Table) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table.name
        )
    }

    fn request(&self, method: Method, table: &Table) -> RequestBuilder {
        self.http
            .request(method, self.url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn read(&self, table: &Table) -> RequestBuilder {
        self.request(Method::GET, table)
            .query(&[("select", table.select())])
    }

    fn write(&self, method: Method, table: &Table) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", "return=representation")
            .query(&[("select", table.select())])
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        table: &Table,
        request: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = check_status(request.send().await?).await?;
        let rows: Vec<T> = response.json().await?;

        debug!(table = table.name, rows = rows.len(), "fetched rows");

        Ok(rows)
    }

    async fn single<T: DeserializeOwned>(
        &self,
        table: &Table,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        self.rows(table, request)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    /// Codes are stored normalised, so an exact `eq` match suffices.
    fn find_by_code_request(&self, code: &PromotionCode) -> RequestBuilder {
        self.read(&self.schema.promotions)
            .query(&[("name", eq(code)), ("limit", "1".to_string())])
    }

    fn promotion_record(&self, row: PromotionRow) -> Result<PromotionRecord, StoreError> {
        row.into_record(self.config.currency)
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();

    Err(match status {
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::CONFLICT => StoreError::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS => StoreError::Unavailable(format!("{status}: {text}")),
        status if status.is_server_error() => StoreError::Unavailable(format!("{status}: {text}")),
        status => StoreError::UnexpectedResponse(format!(
            "request failed with status {status}: {text}"
        )),
    })
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

fn payload<T: Serialize>(row: &T) -> Result<Value, StoreError> {
    serde_json::to_value(row).map_err(|error| StoreError::Decode(error.to_string()))
}

fn amount_from_f64(value: f64, currency: &'static Currency) -> Result<Amount, StoreError> {
    Decimal::from_f64(value)
        .ok_or_else(|| StoreError::Decode(format!("amount {value} is not finite")))
        .and_then(|value| {
            amount_from_decimal(value, currency)
                .map_err(|error| StoreError::Decode(error.to_string()))
        })
}

fn amount_to_f64(amount: &Amount) -> Result<f64, StoreError> {
    major_units(amount)
        .to_f64()
        .ok_or_else(|| StoreError::Decode(format!("amount {amount} cannot be stored")))
}

/// `promotions` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PromotionRow {
    id: PromotionUuid,
    name: String,
    description: Option<String>,
    discount_percentage: Option<f64>,
    discount_amount: Option<f64>,
    valid_from: String,
    valid_until: String,
    status: String,
    #[serde(default, skip_serializing)]
    created_at: Option<Timestamp>,
    #[serde(default, skip_serializing)]
    updated_at: Option<Timestamp>,
}

impl PromotionRow {
    fn from_promotion(uuid: PromotionUuid, promotion: &Promotion) -> Result<Self, StoreError> {
        let discount = promotion.discount();

        Ok(Self {
            id: uuid,
            name: promotion.code().to_string(),
            description: promotion.description().map(str::to_string),
            discount_percentage: discount
                .and_then(PromotionDiscount::points)
                .and_then(|points| points.to_f64()),
            discount_amount: discount
                .and_then(PromotionDiscount::amount)
                .map(|amount| amount_to_f64(&amount))
                .transpose()?,
            valid_from: promotion.window().valid_from().to_string(),
            valid_until: promotion.window().valid_until().to_string(),
            status: promotion.status().as_str().to_string(),
            created_at: None,
            updated_at: None,
        })
    }

    fn into_record(self, currency: &'static Currency) -> Result<PromotionRecord, StoreError> {
        let decode = |error: &dyn std::fmt::Display| {
            StoreError::Decode(format!("promotion {}: {error}", self.id))
        };

        let amount = self
            .discount_amount
            .map(|value| amount_from_f64(value, currency))
            .transpose()?;

        let percentage = self
            .discount_percentage
            .map(|value| {
                Decimal::from_f64(value)
                    .ok_or_else(|| decode(&format!("percentage {value} is not finite")))
            })
            .transpose()?;

        let discount =
            PromotionDiscount::from_columns(amount, percentage).map_err(|error| decode(&error))?;

        let code = PromotionCode::parse(&self.name).map_err(|error| decode(&error))?;
        let window = ValidityWindow::parse(&self.valid_from, &self.valid_until)
            .map_err(|error| decode(&error))?;
        let status = self
            .status
            .parse::<PromotionStatus>()
            .map_err(|error| decode(&error))?;

        let mut promotion = Promotion::new(code, discount, window, status);

        promotion.set_description(self.description.clone());

        let created_at = self.created_at.ok_or_else(|| decode(&"missing created_at"))?;

        Ok(PromotionRecord {
            uuid: self.id,
            promotion,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

/// `fields` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FieldRow {
    id: FieldUuid,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    price: f64,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    surface: Option<String>,
    status: String,
}

impl FieldRow {
    fn from_field(uuid: FieldUuid, field: &Field) -> Result<Self, StoreError> {
        let text = |value: &str| (!value.is_empty()).then(|| value.to_string());

        Ok(Self {
            id: uuid,
            name: field.name.clone(),
            description: text(&field.description),
            location: text(&field.location),
            price: amount_to_f64(&field.hourly_rate)?,
            size: text(&field.size),
            surface: text(&field.surface),
            status: field.status.as_str().to_string(),
        })
    }

    fn into_record(self, currency: &'static Currency) -> Result<FieldRecord, StoreError> {
        let decode = |error: &dyn std::fmt::Display| {
            StoreError::Decode(format!("field {}: {error}", self.id))
        };

        let mut field =
            Field::new(self.name.clone(), amount_from_f64(self.price, currency)?)
                .map_err(|error| decode(&error))?;

        field.status = self
            .status
            .parse::<FieldStatus>()
            .map_err(|error| decode(&error))?;
        field.description = self.description.clone().unwrap_or_default();
        field.location = self.location.clone().unwrap_or_default();
        field.size = self.size.clone().unwrap_or_default();
        field.surface = self.surface.clone().unwrap_or_default();

        Ok(FieldRecord {
            uuid: self.id,
            field,
        })
    }
}

/// `bookings` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BookingRow {
    id: BookingUuid,
    user_id: UserUuid,
    field_id: FieldUuid,
    start_time: String,
    end_time: String,
    status: String,
    payment_status: String,
    promotion_id: Option<PromotionUuid>,
    total_price: f64,
    #[serde(default, skip_serializing)]
    created_at: Option<Timestamp>,
}

impl BookingRow {
    fn from_new(booking: &NewBooking) -> Result<Self, StoreError> {
        if !booking.slots.is_contiguous() {
            return Err(SchemaError::NonContiguousSlots.into());
        }

        Ok(Self {
            id: booking.uuid,
            user_id: booking.user,
            field_id: booking.field,
            start_time: booking.start_time.to_string(),
            end_time: booking.end_time.to_string(),
            status: BookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Unpaid.as_str().to_string(),
            promotion_id: booking.promotion,
            total_price: amount_to_f64(&booking.total)?,
            created_at: None,
        })
    }

    fn into_record(
        self,
        currency: &'static Currency,
        time_zone: &TimeZone,
    ) -> Result<BookingRecord, StoreError> {
        let decode = |error: &dyn std::fmt::Display| {
            StoreError::Decode(format!("booking {}: {error}", self.id))
        };

        let slots = match (
            self.start_time.parse::<Timestamp>(),
            self.end_time.parse::<Timestamp>(),
        ) {
            (Ok(start), Ok(end)) => slots_between(start, end, time_zone),
            _ => None,
        };

        let status = self
            .status
            .parse::<BookingStatus>()
            .map_err(|error| decode(&error))?;
        let payment_status = self
            .payment_status
            .parse::<PaymentStatus>()
            .map_err(|error| decode(&error))?;

        Ok(BookingRecord {
            uuid: self.id,
            user: self.user_id,
            field: self.field_id,
            slots,
            status,
            payment_status,
            promotion: self.promotion_id,
            total: amount_from_f64(self.total_price, currency)?,
            created_at: self.created_at.ok_or_else(|| decode(&"missing created_at"))?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

/// Hourly slots covering `[start, end)` in `time_zone`, if the interval starts
/// on the hour and spans at most a day.
fn slots_between(start: Timestamp, end: Timestamp, time_zone: &TimeZone) -> Option<SlotSelection> {
    let mut cursor = start.to_zoned(time_zone.clone());

    if cursor.minute() != 0 || cursor.second() != 0 || cursor.subsec_nanosecond() != 0 {
        return None;
    }

    let mut slots = Vec::new();

    while cursor.timestamp() < end {
        if slots.len() == 24 {
            return None;
        }

        slots.push(TimeSlot::new(cursor.date(), cursor.hour()).ok()?);
        cursor = cursor.checked_add(1.hour()).ok()?;
    }

    SlotSelection::new(slots).ok()
}

fn day_bounds(date: Date, time_zone: &TimeZone) -> Result<(Timestamp, Timestamp), StoreError> {
    let out_of_range = |error: jiff::Error| StoreError::Decode(format!("{date}: {error}"));

    let start = date.to_zoned(time_zone.clone()).map_err(out_of_range)?;
    let end = date
        .tomorrow()
        .and_then(|tomorrow| tomorrow.to_zoned(time_zone.clone()))
        .map_err(out_of_range)?;

    Ok((start.timestamp(), end.timestamp()))
}

#[async_trait]
impl PromotionsStore for RestBackend {
    async fn find_by_code(
        &self,
        code: &PromotionCode,
    ) -> Result<Option<PromotionRecord>, StoreError> {
        let table = &self.schema.promotions;
        let request = self.find_by_code_request(code);

        self.rows::<PromotionRow>(table, request)
            .await?
            .into_iter()
            .next()
            .map(|row| self.promotion_record(row))
            .transpose()
    }

    async fn get(&self, uuid: PromotionUuid) -> Result<PromotionRecord, StoreError> {
        let table = &self.schema.promotions;
        let request = self.read(table).query(&[(table.key, eq(uuid))]);

        self.promotion_record(self.single(table, request).await?)
    }

    async fn list(&self) -> Result<Vec<PromotionRecord>, StoreError> {
        let table = &self.schema.promotions;
        let request = self.read(table).query(&[("order", "name.asc")]);

        self.rows::<PromotionRow>(table, request)
            .await?
            .into_iter()
            .map(|row| self.promotion_record(row))
            .collect()
    }

    async fn list_active(&self, now: Timestamp) -> Result<Vec<PromotionRecord>, StoreError> {
        let table = &self.schema.promotions;
        let request = self.read(table).query(&[
            ("status", "eq.active".to_string()),
            ("valid_from", format!("lte.{now}")),
            ("valid_until", format!("gte.{now}")),
            ("order", "name.asc".to_string()),
        ]);

        let records = self
            .rows::<PromotionRow>(table, request)
            .await?
            .into_iter()
            .map(|row| self.promotion_record(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records
            .into_iter()
            .filter(|record| record.promotion.is_valid(now))
            .collect())
    }

    async fn insert(&self, promotion: NewPromotion) -> Result<PromotionRecord, StoreError> {
        let table = &self.schema.promotions;
        let body = payload(&PromotionRow::from_promotion(
            promotion.uuid,
            &promotion.promotion,
        )?)?;

        table.check_insert(&body)?;

        let request = self.write(Method::POST, table).json(&body);

        self.promotion_record(self.single(table, request).await?)
    }

    async fn update(
        &self,
        uuid: PromotionUuid,
        promotion: Promotion,
    ) -> Result<PromotionRecord, StoreError> {
        let table = &self.schema.promotions;
        let body = payload(&PromotionRow::from_promotion(uuid, &promotion)?)?;

        table.check_update(&body)?;

        let request = self
            .write(Method::PATCH, table)
            .query(&[(table.key, eq(uuid))])
            .json(&body);

        self.promotion_record(self.single(table, request).await?)
    }

    async fn delete(&self, uuid: PromotionUuid) -> Result<(), StoreError> {
        let table = &self.schema.promotions;
        let request = self
            .write(Method::DELETE, table)
            .query(&[(table.key, eq(uuid))]);

        self.single::<PromotionRow>(table, request).await.map(|_row| ())
    }
}

#[async_trait]
impl FieldsRepository for RestBackend {
    async fn list_fields(&self) -> Result<Vec<FieldRecord>, StoreError> {
        let table = &self.schema.fields;
        let request = self.read(table).query(&[("order", "name.asc")]);

        self.rows::<FieldRow>(table, request)
            .await?
            .into_iter()
            .map(|row| row.into_record(self.config.currency))
            .collect()
    }

    async fn get_field(&self, field: FieldUuid) -> Result<FieldRecord, StoreError> {
        let table = &self.schema.fields;
        let request = self.read(table).query(&[(table.key, eq(field))]);

        self.single::<FieldRow>(table, request)
            .await?
            .into_record(self.config.currency)
    }

    async fn hourly_rate(&self, field: FieldUuid) -> Result<Amount, StoreError> {
        Ok(self.get_field(field).await?.field.hourly_rate)
    }

    async fn insert_field(&self, record: FieldRecord) -> Result<FieldRecord, StoreError> {
        let table = &self.schema.fields;
        let body = payload(&FieldRow::from_field(record.uuid, &record.field)?)?;

        table.check_insert(&body)?;

        let request = self.write(Method::POST, table).json(&body);

        self.single::<FieldRow>(table, request)
            .await?
            .into_record(self.config.currency)
    }

    async fn update_field(&self, uuid: FieldUuid, field: Field) -> Result<FieldRecord, StoreError> {
        let table = &self.schema.fields;
        let body = payload(&FieldRow::from_field(uuid, &field)?)?;

        table.check_update(&body)?;

        let request = self
            .write(Method::PATCH, table)
            .query(&[(table.key, eq(uuid))])
            .json(&body);

        self.single::<FieldRow>(table, request)
            .await?
            .into_record(self.config.currency)
    }

    async fn delete_field(&self, uuid: FieldUuid) -> Result<(), StoreError> {
        let table = &self.schema.fields;
        let request = self
            .write(Method::DELETE, table)
            .query(&[(table.key, eq(uuid))]);

        self.single::<FieldRow>(table, request).await.map(|_row| ())
    }
}

#[async_trait]
impl BookingsRepository for RestBackend {
    async fn booked_slots(
        &self,
        field: FieldUuid,
        date: Date,
    ) -> Result<Vec<TimeSlot>, StoreError> {
        let table = &self.schema.bookings;
        let (day_start, day_end) = day_bounds(date, &self.config.time_zone)?;

        let request = self.read(table).query(&[
            ("field_id", eq(field)),
            ("status", "neq.cancelled".to_string()),
            ("start_time", format!("lt.{day_end}")),
            ("end_time", format!("gt.{day_start}")),
        ]);

        let mut slots = Vec::new();

        for row in self.rows::<BookingRow>(table, request).await? {
            let record = row.into_record(self.config.currency, &self.config.time_zone)?;

            slots.extend(
                record
                    .slots
                    .iter()
                    .flat_map(SlotSelection::iter)
                    .filter(|slot| slot.date() == date)
                    .copied(),
            );
        }

        slots.sort_unstable();
        slots.dedup();

        Ok(slots)
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<BookingRecord, StoreError> {
        let table = &self.schema.bookings;
        let body = payload(&BookingRow::from_new(&booking)?)?;

        table.check_insert(&body)?;

        let request = self.write(Method::POST, table).json(&body);

        self.single::<BookingRow>(table, request)
            .await?
            .into_record(self.config.currency, &self.config.time_zone)
    }

    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let table = &self.schema.bookings;
        let request = self.read(table).query(&[("order", "created_at.desc")]);

        self.rows::<BookingRow>(table, request)
            .await?
            .into_iter()
            .map(|row| row.into_record(self.config.currency, &self.config.time_zone))
            .collect()
    }

    async fn update_status(
        &self,
        booking: BookingUuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, StoreError> {
        let table = &self.schema.bookings;
        let body = json!({ "status": status.as_str() });

        table.check_update(&body)?;

        let request = self
            .write(Method::PATCH, table)
            .query(&[(table.key, eq(booking))])
            .json(&body);

        self.single::<BookingRow>(table, request)
            .await?
            .into_record(self.config.currency, &self.config.time_zone)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::{civil::date, tz};
    use pitchside::{
        fixtures::sample_promotions,
        promotions::PromotionError,
        slots::OpeningHours,
    };
    use rusty_money::{Money, iso::THB};
    use testresult::TestResult;

    use crate::{
        domain::promotions::{PromotionsService, PromotionsServiceError, StorePromotionsService},
        session::UserUuid,
    };

    use super::*;

    fn backend(base_url: &str) -> TestResult<RestBackend> {
        Ok(RestBackend::new(
            RestConfig {
                base_url: base_url.to_string(),
                api_key: "anon-key".to_string(),
                timeout: Duration::from_secs(2),
                currency: THB,
                time_zone: TimeZone::fixed(tz::offset(7)),
            },
            1,
        )?)
    }

    fn promotion_row() -> PromotionRow {
        PromotionRow {
            id: PromotionUuid::new(),
            name: "SUMMER200".to_string(),
            description: None,
            discount_percentage: None,
            discount_amount: Some(200.0),
            valid_from: "2025-01-01T00:00:00+00:00".to_string(),
            valid_until: "2026-12-31T00:00:00+00:00".to_string(),
            status: "active".to_string(),
            created_at: Some(Timestamp::UNIX_EPOCH),
            updated_at: None,
        }
    }

    fn new_booking(hours: &[i8]) -> TestResult<NewBooking> {
        let day = date(2025, 6, 1);
        let opening = OpeningHours::default();
        let slots = SlotSelection::new(
            hours
                .iter()
                .map(|hour| opening.slot(day, *hour))
                .collect::<Result<Vec<_>, _>>()?,
        )?;

        Ok(NewBooking {
            uuid: BookingUuid::new(),
            user: UserUuid::new(),
            field: FieldUuid::new(),
            slots,
            start_time: "2025-06-01T06:00:00Z".parse()?,
            end_time: "2025-06-01T08:00:00Z".parse()?,
            promotion: None,
            total: Money::from_minor(15_000, THB),
        })
    }

    #[test]
    fn unknown_schema_version_fails_at_construction() {
        let result = RestBackend::new(
            RestConfig {
                base_url: "http://localhost".to_string(),
                api_key: String::new(),
                timeout: Duration::from_secs(1),
                currency: THB,
                time_zone: TimeZone::UTC,
            },
            2,
        );

        assert!(matches!(
            result,
            Err(RestInitError::Schema(SchemaError::UnknownVersion(2)))
        ));
    }

    #[test]
    fn url_joins_base_and_table() -> TestResult {
        let backend = backend("https://example.test/")?;

        assert_eq!(
            backend.url(&backend.schema.bookings),
            "https://example.test/rest/v1/bookings"
        );

        Ok(())
    }

    #[test]
    fn code_lookup_filters_by_exact_name() -> TestResult {
        let backend = backend("https://example.test")?;
        let request = backend
            .find_by_code_request(&PromotionCode::parse("summer_200")?)
            .build()?;

        let query = request.url().query().unwrap_or_default().to_string();

        assert!(query.contains("name=eq.SUMMER_200"), "query was {query}");
        assert!(!query.contains("like"), "query was {query}");
        assert_eq!(request.url().path(), "/rest/v1/promotions");

        Ok(())
    }

    #[tokio::test]
    async fn wildcard_code_never_reaches_the_backend() -> TestResult {
        let store: Arc<dyn PromotionsStore> = Arc::new(backend("http://127.0.0.1:9")?);
        let service = StorePromotionsService::new(store, sample_promotions()?);

        for code in ["%", "*", "SUMMER%00"] {
            let result = service.search_by_code(code).await;

            assert!(
                matches!(
                    result,
                    Err(PromotionsServiceError::Invalid(PromotionError::InvalidCode(_)))
                ),
                "{code:?} gave {result:?}"
            );
        }

        Ok(())
    }

    #[test]
    fn promotion_row_decodes_fixed_discount() -> TestResult {
        let record = promotion_row().into_record(THB)?;

        assert_eq!(record.promotion.display_text(), "off by 200 THB");
        assert_eq!(record.updated_at, Timestamp::UNIX_EPOCH);

        Ok(())
    }

    #[test]
    fn promotion_row_with_both_discounts_is_rejected() {
        let row = PromotionRow {
            discount_percentage: Some(20.0),
            ..promotion_row()
        };

        assert!(matches!(row.into_record(THB), Err(StoreError::Decode(_))));
    }

    #[test]
    fn promotion_payloads_match_the_schema() -> TestResult {
        let schema = Schema::for_version(1)?;

        for promotion in sample_promotions()? {
            let body = payload(&PromotionRow::from_promotion(
                PromotionUuid::new(),
                &promotion,
            )?)?;

            schema.promotions.check_insert(&body)?;
        }

        Ok(())
    }

    #[test]
    fn field_payloads_match_the_schema() -> TestResult {
        let schema = Schema::for_version(1)?;
        let mut field = Field::new("Stadium 5", Money::from_minor(9_050, THB))?;

        field.location = "North wing".to_string();

        let uuid = FieldUuid::new();
        let body = payload(&FieldRow::from_field(uuid, &field)?)?;

        schema.fields.check_insert(&body)?;
        schema.fields.check_update(&body)?;

        assert_eq!(body.get("id"), Some(&json!(uuid.to_string())));
        assert_eq!(body.get("price"), Some(&json!(90.5)));
        assert_eq!(body.get("status"), Some(&json!("available")));
        assert_eq!(body.get("surface"), Some(&Value::Null));

        let row: FieldRow = serde_json::from_value(body)?;

        assert_eq!(row.into_record(THB)?.field, field);

        Ok(())
    }

    #[test]
    fn booking_payload_matches_the_schema() -> TestResult {
        let schema = Schema::for_version(1)?;
        let body = payload(&BookingRow::from_new(&new_booking(&[13, 14])?)?)?;

        schema.bookings.check_insert(&body)?;

        assert_eq!(body.get("total_price"), Some(&json!(150.0)));
        assert_eq!(body.get("created_at"), None);

        Ok(())
    }

    #[tokio::test]
    async fn non_contiguous_booking_is_rejected_before_sending() -> TestResult {
        // nothing listens here; the request must never be made
        let backend = backend("http://127.0.0.1:9")?;

        let result = backend.create_booking(new_booking(&[13, 15])?).await;

        assert!(
            matches!(
                result,
                Err(StoreError::Schema(SchemaError::NonContiguousSlots))
            ),
            "expected NonContiguousSlots, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() -> TestResult {
        let backend = backend("http://127.0.0.1:9")?;

        let result = backend.find_by_code(&PromotionCode::parse("SUMMER200")?).await;

        assert!(
            matches!(result, Err(StoreError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn booking_row_derives_local_slots() -> TestResult {
        let row = BookingRow {
            id: BookingUuid::new(),
            user_id: UserUuid::new(),
            field_id: FieldUuid::new(),
            start_time: "2025-06-01T06:00:00+00:00".to_string(),
            end_time: "2025-06-01T08:00:00+00:00".to_string(),
            status: "confirmed".to_string(),
            payment_status: "paid".to_string(),
            promotion_id: None,
            total_price: 150.0,
            created_at: Some(Timestamp::UNIX_EPOCH),
        };

        let record = row.into_record(THB, &TimeZone::fixed(tz::offset(7)))?;

        assert_eq!(
            record.slots.map(|slots| slots.labels()),
            Some(vec!["13:00 - 14:00".to_string(), "14:00 - 15:00".to_string()])
        );
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert_eq!(record.total, Money::from_minor(15_000, THB));

        Ok(())
    }

    #[test]
    fn booking_row_with_unreadable_start_has_no_slots() -> TestResult {
        let row = BookingRow {
            id: BookingUuid::new(),
            user_id: UserUuid::new(),
            field_id: FieldUuid::new(),
            start_time: "garbage".to_string(),
            end_time: "2025-06-01T08:00:00+00:00".to_string(),
            status: "pending".to_string(),
            payment_status: "unpaid".to_string(),
            promotion_id: None,
            total_price: 0.0,
            created_at: Some(Timestamp::UNIX_EPOCH),
        };

        let record = row.into_record(THB, &TimeZone::UTC)?;

        assert_eq!(record.slots, None);
        assert_eq!(record.start_time, "garbage");

        Ok(())
    }
}
