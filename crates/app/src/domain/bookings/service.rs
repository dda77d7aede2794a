//! Bookings Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use mockall::automock;
use pitchside::{
    pricing::{self, PricingError, base_price, parse_instant, price_breakdown},
    promotions::Promotion,
    slots::{OpeningHours, SlotAvailability, SlotSelection, availability},
};
use rustc_hash::FxHashMap;
use tracing::{Span, info};

use crate::{
    domain::{
        StoreError,
        bookings::{
            BookingsRepository, BookingsServiceError,
            data::{
                AppliedPromotion, BookingQuote, BookingReport, ExpectedPrice, NewBooking,
                QuoteRequest,
            },
            records::{BookingRecord, BookingStatus, BookingUuid},
        },
        fields::{
            FieldsRepository,
            records::{FieldRecord, FieldUuid},
        },
        promotions::{
            PromotionsService, PromotionsServiceError,
            records::PromotionUuid,
        },
    },
    session::Session,
};

/// Booking flow over the field, booking and promotion collaborators.
#[derive(Clone)]
pub struct StoreBookingsService {
    fields: Arc<dyn FieldsRepository>,
    bookings: Arc<dyn BookingsRepository>,
    promotions: Arc<dyn PromotionsService>,
    opening_hours: OpeningHours,
    time_zone: TimeZone,
}

impl StoreBookingsService {
    #[must_use]
    pub fn new(
        fields: Arc<dyn FieldsRepository>,
        bookings: Arc<dyn BookingsRepository>,
        promotions: Arc<dyn PromotionsService>,
        opening_hours: OpeningHours,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            fields,
            bookings,
            promotions,
            opening_hours,
            time_zone,
        }
    }

    async fn bookable_field(&self, field: FieldUuid) -> Result<FieldRecord, BookingsServiceError> {
        let record = self.fields.get_field(field).await.map_err(|error| match error {
            StoreError::NotFound => BookingsServiceError::UnknownField,
            error => BookingsServiceError::Store(error),
        })?;

        if !record.field.is_bookable() {
            return Err(BookingsServiceError::FieldUnavailable);
        }

        Ok(record)
    }

    fn select(&self, date: Date, hours: &[i8]) -> Result<SlotSelection, BookingsServiceError> {
        if hours.is_empty() {
            return Err(BookingsServiceError::NoSlotsSelected);
        }

        let slots = hours
            .iter()
            .map(|hour| self.opening_hours.slot(date, *hour))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SlotSelection::new(slots)?)
    }

    fn span_instants(
        &self,
        slots: &SlotSelection,
    ) -> Result<(Timestamp, Timestamp), BookingsServiceError> {
        let (Some(first), Some(last)) = (slots.iter().next(), slots.iter().last()) else {
            return Err(BookingsServiceError::NoSlotsSelected);
        };

        Ok((
            first.start_in(&self.time_zone)?,
            last.end_in(&self.time_zone)?,
        ))
    }

    async fn report_promotions(
        &self,
        session: &Session,
        bookings: &[BookingRecord],
    ) -> Result<FxHashMap<PromotionUuid, Promotion>, BookingsServiceError> {
        let mut promotions = FxHashMap::default();

        for uuid in bookings.iter().filter_map(|booking| booking.promotion) {
            if promotions.contains_key(&uuid) {
                continue;
            }

            match self.promotions.get(session, uuid).await {
                Ok(record) => {
                    promotions.insert(uuid, record.promotion);
                }
                // deleted since the booking was made
                Err(PromotionsServiceError::NotFound) => {}
                Err(error) => return Err(error.into()),
            }
        }

        Ok(promotions)
    }
}

impl std::fmt::Debug for StoreBookingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBookingsService")
            .field("opening_hours", &self.opening_hours)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

fn expected_price(
    booking: &BookingRecord,
    field: Option<&FieldRecord>,
    promotion: Option<&Promotion>,
    now: Timestamp,
) -> Result<ExpectedPrice, PricingError> {
    let Some(field) = field else {
        return Ok(ExpectedPrice::Indeterminate("unknown field".to_string()));
    };

    let instants = parse_instant(&booking.start_time)
        .and_then(|start| Ok((start, parse_instant(&booking.end_time)?)));

    let result = instants.and_then(|(start, end)| {
        pricing::expected_price(&field.field.hourly_rate, start, end, promotion, now)
    });

    match result {
        Ok(breakdown) => Ok(ExpectedPrice::Amount(breakdown)),
        Err(PricingError::IndeterminateDuration(reason)) => {
            Ok(ExpectedPrice::Indeterminate(reason))
        }
        Err(error) => Err(error),
    }
}

#[async_trait]
impl BookingsService for StoreBookingsService {
    async fn available_slots(
        &self,
        field: FieldUuid,
        date: Date,
    ) -> Result<Vec<SlotAvailability>, BookingsServiceError> {
        self.bookable_field(field).await?;

        let booked = self.bookings.booked_slots(field, date).await?;

        Ok(availability(&self.opening_hours.slots(date), &booked))
    }

    #[tracing::instrument(
        name = "bookings.service.quote",
        skip(self, session, request),
        fields(
            user_uuid = ?session.user(),
            field_uuid = %request.field,
            slot_count = request.hours.len(),
            promotion_code = tracing::field::Empty
        ),
        err
    )]
    async fn quote(
        &self,
        session: &Session,
        request: QuoteRequest,
        now: Timestamp,
    ) -> Result<BookingQuote, BookingsServiceError> {
        let field = self.bookable_field(request.field).await?;
        let slots = self.select(request.date, &request.hours)?;

        let booked = self.bookings.booked_slots(request.field, request.date).await?;

        if let Some(taken) = booked.iter().find(|slot| slots.contains(slot)) {
            return Err(BookingsServiceError::SlotUnavailable(format!(
                "{} {}",
                taken.date(),
                taken
            )));
        }

        let lookup = match request.promotion_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                Span::current().record("promotion_code", code);

                Some(self.promotions.apply_code(code, now).await?)
            }
            _ => None,
        };

        let base = base_price(&field.field.hourly_rate, slots.len())?;
        let price = price_breakdown(&base, lookup.as_ref().map(|lookup| &lookup.promotion), now)?;

        let promotion = lookup.map(|lookup| AppliedPromotion {
            uuid: lookup.uuid,
            code: lookup.promotion.code().clone(),
            display_text: lookup.promotion.display_text(),
            source: lookup.source,
        });

        Ok(BookingQuote {
            field: field.uuid,
            field_name: field.field.name,
            slots,
            hourly_rate: field.field.hourly_rate,
            price,
            promotion,
            quoted_at: now,
        })
    }

    #[tracing::instrument(
        name = "bookings.service.confirm",
        skip(self, session, quote),
        fields(field_uuid = %quote.field, slot_count = quote.slots.len()),
        err
    )]
    async fn confirm(
        &self,
        session: &Session,
        quote: BookingQuote,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let user = session.require_user()?;

        let unverified = quote
            .promotion
            .as_ref()
            .filter(|applied| applied.uuid.is_none());

        if let Some(promotion) = unverified {
            return Err(BookingsServiceError::UnverifiedPromotion(
                promotion.code.clone(),
            ));
        }

        if !quote.slots.is_contiguous() {
            return Err(BookingsServiceError::NonContiguousSlots);
        }

        let (start_time, end_time) = self.span_instants(&quote.slots)?;

        let record = self
            .bookings
            .create_booking(NewBooking {
                uuid: BookingUuid::new(),
                user,
                field: quote.field,
                slots: quote.slots,
                start_time,
                end_time,
                promotion: quote.promotion.and_then(|promotion| promotion.uuid),
                total: quote.price.final_price,
            })
            .await?;

        info!(booking_uuid = %record.uuid, user_uuid = %user, "created booking");

        Ok(record)
    }

    #[tracing::instrument(name = "bookings.service.reports", skip(self, session), err)]
    async fn reports(
        &self,
        session: &Session,
        now: Timestamp,
    ) -> Result<Vec<BookingReport>, BookingsServiceError> {
        session.require_admin()?;

        let bookings = self.bookings.list_bookings().await?;

        let fields: FxHashMap<FieldUuid, FieldRecord> = self
            .fields
            .list_fields()
            .await?
            .into_iter()
            .map(|record| (record.uuid, record))
            .collect();

        let promotions = self.report_promotions(session, &bookings).await?;

        bookings
            .into_iter()
            .map(|booking| -> Result<BookingReport, BookingsServiceError> {
                let field = fields.get(&booking.field);
                let promotion = booking.promotion.and_then(|uuid| promotions.get(&uuid));
                let expected = expected_price(&booking, field, promotion, now)?;

                Ok(BookingReport {
                    field_name: field.map(|record| record.field.name.clone()),
                    promotion_code: promotion.map(|promotion| promotion.code().clone()),
                    expected,
                    booking,
                })
            })
            .collect()
    }

    #[tracing::instrument(
        name = "bookings.service.update_status",
        skip(self, session),
        fields(booking_uuid = %booking, status = %status),
        err
    )]
    async fn update_status(
        &self,
        session: &Session,
        booking: BookingUuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, BookingsServiceError> {
        session.require_admin()?;

        let record = self.bookings.update_status(booking, status).await?;

        info!(booking_uuid = %booking, %status, "updated booking status");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Every slot of `date` on `field`, marked booked or free.
    async fn available_slots(
        &self,
        field: FieldUuid,
        date: Date,
    ) -> Result<Vec<SlotAvailability>, BookingsServiceError>;

    /// Price a slot selection, applying the promotion code if one is given.
    async fn quote(
        &self,
        session: &Session,
        request: QuoteRequest,
        now: Timestamp,
    ) -> Result<BookingQuote, BookingsServiceError>;

    /// Persist a quoted booking for the signed-in user.
    async fn confirm(
        &self,
        session: &Session,
        quote: BookingQuote,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Every booking with its expected price at `now`. Administrators only.
    async fn reports(
        &self,
        session: &Session,
        now: Timestamp,
    ) -> Result<Vec<BookingReport>, BookingsServiceError>;

    /// Change a booking's status. Administrators only.
    async fn update_status(
        &self,
        session: &Session,
        booking: BookingUuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, BookingsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz};
    use pitchside::{
        fixtures::sample_promotions,
        money::format_amount,
        promotions::PromotionCode,
        slots::SlotError,
    };
    use rusty_money::{Money, iso::THB};
    use testresult::TestResult;

    use crate::{
        domain::{
            bookings::{InMemoryBookingsRepository, records::PaymentStatus},
            fields::InMemoryFieldsRepository,
            promotions::{
                InMemoryPromotionsStore, MockPromotionsService, StorePromotionsService,
                data::PromotionLookup,
            },
        },
        session::{AccessError, UserUuid},
    };

    use super::*;

    const STADIUM_4: &str = "0190f3a0-0000-7000-8000-000000000004";

    fn now() -> TestResult<Timestamp> {
        Ok("2025-06-01T09:00:00Z".parse()?)
    }

    fn stadium_4() -> TestResult<FieldUuid> {
        Ok(STADIUM_4.parse()?)
    }

    fn service_with(
        promotions: Arc<dyn PromotionsService>,
        bookings: Arc<dyn BookingsRepository>,
    ) -> TestResult<StoreBookingsService> {
        Ok(StoreBookingsService::new(
            Arc::new(InMemoryFieldsRepository::samples()?),
            bookings,
            promotions,
            OpeningHours::default(),
            TimeZone::fixed(tz::offset(7)),
        ))
    }

    fn service() -> TestResult<StoreBookingsService> {
        let promotions = StorePromotionsService::new(
            Arc::new(InMemoryPromotionsStore::samples()?),
            sample_promotions()?,
        );

        service_with(
            Arc::new(promotions),
            Arc::new(InMemoryBookingsRepository::new()),
        )
    }

    fn request(hours: &[i8], code: Option<&str>) -> TestResult<QuoteRequest> {
        Ok(QuoteRequest {
            field: stadium_4()?,
            date: date(2025, 6, 1),
            hours: hours.to_vec(),
            promotion_code: code.map(str::to_string),
        })
    }

    fn customer() -> Session {
        Session::customer(UserUuid::new())
    }

    #[tokio::test]
    async fn quote_applies_fixed_promotion() -> TestResult {
        let quote = service()?
            .quote(&Session::guest(), request(&[18, 19, 20], Some("summer200"))?, now()?)
            .await?;

        assert_eq!(format_amount(&quote.price.base), "225 THB");
        assert_eq!(format_amount(&quote.price.final_price), "25 THB");
        assert_eq!(quote.field_name, "Stadium 4");
        assert_eq!(
            quote.promotion.map(|promotion| promotion.display_text),
            Some("off by 200 THB".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_without_code_charges_base_price() -> TestResult {
        let quote = service()?
            .quote(&Session::guest(), request(&[13], Some("  "))?, now()?)
            .await?;

        assert_eq!(quote.price.final_price, Money::from_minor(7_500, THB));
        assert_eq!(quote.promotion, None);

        Ok(())
    }

    #[tokio::test]
    async fn quote_without_slots_is_rejected() -> TestResult {
        let result = service()?
            .quote(&Session::guest(), request(&[], None)?, now()?)
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::NoSlotsSelected)),
            "expected NoSlotsSelected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_outside_opening_hours_is_rejected() -> TestResult {
        let result = service()?
            .quote(&Session::guest(), request(&[9], None)?, now()?)
            .await;

        assert!(
            matches!(
                result,
                Err(BookingsServiceError::Slot(SlotError::OutsideOpeningHours { .. }))
            ),
            "expected OutsideOpeningHours, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_for_unknown_field_is_rejected() -> TestResult {
        let mut request = request(&[13], None)?;

        request.field = FieldUuid::new();

        let result = service()?.quote(&Session::guest(), request, now()?).await;

        assert!(
            matches!(result, Err(BookingsServiceError::UnknownField)),
            "expected UnknownField, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_with_expired_code_is_rejected() -> TestResult {
        let result = service()?
            .quote(&Session::guest(), request(&[13], Some("EXPIRED2024"))?, now()?)
            .await;

        assert!(
            matches!(
                result,
                Err(BookingsServiceError::Promotion(
                    PromotionsServiceError::ExpiredOrInactive(_)
                ))
            ),
            "expected ExpiredOrInactive, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn confirm_requires_sign_in() -> TestResult {
        let service = service()?;
        let quote = service
            .quote(&Session::guest(), request(&[13], None)?, now()?)
            .await?;

        let result = service.confirm(&Session::guest(), quote).await;

        assert!(
            matches!(
                result,
                Err(BookingsServiceError::Access(AccessError::SignInRequired))
            ),
            "expected SignInRequired, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn confirm_stores_local_slot_span() -> TestResult {
        let service = service()?;
        let session = customer();
        let quote = service
            .quote(&session, request(&[14, 13], Some("WELCOME20"))?, now()?)
            .await?;

        let record = service.confirm(&session, quote).await?;

        // 13:00-15:00 at +07:00
        assert_eq!(record.start_time, "2025-06-01T06:00:00Z");
        assert_eq!(record.end_time, "2025-06-01T08:00:00Z");
        assert_eq!(record.total, Money::from_minor(12_000, THB));
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.payment_status, PaymentStatus::Unpaid);
        assert!(record.promotion.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn confirm_rejects_slots_with_a_gap() -> TestResult {
        let service = service()?;
        let session = customer();
        let quote = service
            .quote(&session, request(&[13, 15], None)?, now()?)
            .await?;

        assert_eq!(format_amount(&quote.price.final_price), "150 THB");

        let result = service.confirm(&session, quote).await;

        assert!(
            matches!(result, Err(BookingsServiceError::NonContiguousSlots)),
            "expected NonContiguousSlots, got {result:?}"
        );

        let reports = service.reports(&Session::admin(UserUuid::new()), now()?).await?;

        assert!(reports.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn booked_slot_cannot_be_quoted_or_confirmed_twice() -> TestResult {
        let service = service()?;
        let session = customer();
        let quote = service
            .quote(&session, request(&[20, 21], None)?, now()?)
            .await?;

        service.confirm(&session, quote.clone()).await?;

        let again = service.confirm(&session, quote).await;

        assert!(
            matches!(again, Err(BookingsServiceError::SlotUnavailable(_))),
            "expected SlotUnavailable, got {again:?}"
        );

        let overlapping = service
            .quote(&session, request(&[21, 22], None)?, now()?)
            .await;

        assert!(
            matches!(overlapping, Err(BookingsServiceError::SlotUnavailable(ref slot)) if slot == "2025-06-01 21:00 - 22:00"),
            "expected SlotUnavailable, got {overlapping:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn available_slots_marks_held_hours() -> TestResult {
        let service = service()?;
        let session = customer();
        let quote = service.quote(&session, request(&[15], None)?, now()?).await?;

        service.confirm(&session, quote).await?;

        let booked: Vec<String> = service
            .available_slots(stadium_4()?, date(2025, 6, 1))
            .await?
            .into_iter()
            .filter(|mark| mark.booked)
            .map(|mark| mark.slot.label())
            .collect();

        assert_eq!(booked, ["15:00 - 16:00"]);

        Ok(())
    }

    #[tokio::test]
    async fn confirm_refuses_fallback_promotion() -> TestResult {
        let fallback = sample_promotions()?
            .into_iter()
            .find(|promotion| promotion.code().as_str() == "SUMMER200")
            .ok_or("missing sample")?;

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_apply_code()
            .returning(move |_, _| Ok(PromotionLookup::fallback(fallback.clone())));

        let service = service_with(
            Arc::new(promotions),
            Arc::new(InMemoryBookingsRepository::new()),
        )?;
        let session = customer();

        let quote = service
            .quote(&session, request(&[13, 14, 15], Some("SUMMER200"))?, now()?)
            .await?;

        // the quote itself is still priced
        assert_eq!(format_amount(&quote.price.final_price), "25 THB");

        let result = service.confirm(&session, quote).await;

        assert!(
            matches!(result, Err(BookingsServiceError::UnverifiedPromotion(ref code)) if code == &PromotionCode::parse("SUMMER200")?),
            "expected UnverifiedPromotion, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reports_flag_unreadable_instants() -> TestResult {
        let field = stadium_4()?;
        let user = UserUuid::new();
        let good = BookingRecord {
            uuid: BookingUuid::new(),
            user,
            field,
            slots: None,
            start_time: "2025-06-01T06:00:00Z".to_string(),
            end_time: "2025-06-01T08:30:00Z".to_string(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            promotion: None,
            total: Money::from_minor(18_750, THB),
            created_at: "2025-05-30T10:00:00Z".parse()?,
        };
        let broken = BookingRecord {
            uuid: BookingUuid::new(),
            start_time: "not a time".to_string(),
            created_at: "2025-05-31T10:00:00Z".parse()?,
            ..good.clone()
        };

        let promotions = StorePromotionsService::new(
            Arc::new(InMemoryPromotionsStore::samples()?),
            sample_promotions()?,
        );
        let service = service_with(
            Arc::new(promotions),
            Arc::new(InMemoryBookingsRepository::with_records(vec![good, broken])),
        )?;

        let reports = service.reports(&Session::admin(user), now()?).await?;

        let expected: Vec<&ExpectedPrice> = reports.iter().map(|report| &report.expected).collect();

        assert!(matches!(expected.first(), Some(ExpectedPrice::Indeterminate(_))));
        assert!(matches!(
            expected.get(1),
            Some(ExpectedPrice::Amount(breakdown)) if breakdown.final_price == Money::from_minor(18_750, THB)
        ));
        assert_eq!(
            reports.first().and_then(|report| report.field_name.as_deref()),
            Some("Stadium 4")
        );

        Ok(())
    }

    #[tokio::test]
    async fn reports_and_status_changes_are_admin_only() -> TestResult {
        let service = service()?;
        let session = customer();

        let reports = service.reports(&session, now()?).await;
        let update = service
            .update_status(&session, BookingUuid::new(), BookingStatus::Confirmed)
            .await;

        assert!(
            matches!(reports, Err(BookingsServiceError::Access(AccessError::AdminRequired))),
            "expected AdminRequired, got {reports:?}"
        );
        assert!(
            matches!(update, Err(BookingsServiceError::Access(AccessError::AdminRequired))),
            "expected AdminRequired, got {update:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn admin_confirms_a_booking() -> TestResult {
        let service = service()?;
        let session = customer();
        let quote = service.quote(&session, request(&[16], None)?, now()?).await?;
        let booking = service.confirm(&session, quote).await?;

        let admin = Session::admin(UserUuid::new());
        let record = service
            .update_status(&admin, booking.uuid, BookingStatus::Confirmed)
            .await?;

        assert_eq!(record.status, BookingStatus::Confirmed);

        Ok(())
    }
}
