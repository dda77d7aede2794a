//! Bookings repository.

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date};
use mockall::automock;
use pitchside::slots::TimeSlot;
use tokio::sync::RwLock;

use crate::domain::{
    StoreError,
    bookings::{
        data::NewBooking,
        records::{BookingRecord, BookingStatus, BookingUuid, PaymentStatus},
    },
    fields::records::FieldUuid,
};

#[automock]
#[async_trait]
pub trait BookingsRepository: Send + Sync {
    /// Slots on `date` held by bookings of `field` that are not cancelled.
    async fn booked_slots(&self, field: FieldUuid, date: Date)
    -> Result<Vec<TimeSlot>, StoreError>;

    /// Persist a booking. Fails with [`StoreError::Conflict`] when one of its
    /// slots is already held.
    async fn create_booking(&self, booking: NewBooking) -> Result<BookingRecord, StoreError>;

    /// Every booking, newest first.
    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, StoreError>;

    async fn update_status(
        &self,
        booking: BookingUuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, StoreError>;
}

/// Bookings held in memory.
///
/// A slot of a field can be held by at most one booking that is not cancelled.
#[derive(Debug, Default)]
pub struct InMemoryBookingsRepository {
    bookings: RwLock<Vec<BookingRecord>>,
}

impl InMemoryBookingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BookingRecord>) -> Self {
        Self {
            bookings: RwLock::new(records),
        }
    }
}

fn held_slots(records: &[BookingRecord], field: FieldUuid) -> impl Iterator<Item = &TimeSlot> {
    records
        .iter()
        .filter(move |record| record.field == field && record.status.holds_slots())
        .filter_map(|record| record.slots.as_ref())
        .flat_map(|slots| slots.iter())
}

#[async_trait]
impl BookingsRepository for InMemoryBookingsRepository {
    async fn booked_slots(
        &self,
        field: FieldUuid,
        date: Date,
    ) -> Result<Vec<TimeSlot>, StoreError> {
        let bookings = self.bookings.read().await;

        let mut slots: Vec<TimeSlot> = held_slots(&bookings, field)
            .filter(|slot| slot.date() == date)
            .copied()
            .collect();

        slots.sort_unstable();

        Ok(slots)
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<BookingRecord, StoreError> {
        let mut bookings = self.bookings.write().await;

        if let Some(taken) =
            held_slots(&bookings, booking.field).find(|slot| booking.slots.contains(slot))
        {
            return Err(StoreError::Conflict(format!("{} {}", taken.date(), taken)));
        }

        let record = BookingRecord {
            uuid: booking.uuid,
            user: booking.user,
            field: booking.field,
            slots: Some(booking.slots),
            start_time: booking.start_time.to_string(),
            end_time: booking.end_time.to_string(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            promotion: booking.promotion,
            total: booking.total,
            created_at: Timestamp::now(),
        };

        bookings.push(record.clone());

        Ok(record)
    }

    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let mut records = self.bookings.read().await.clone();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn update_status(
        &self,
        booking: BookingUuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, StoreError> {
        let mut bookings = self.bookings.write().await;

        let record = bookings
            .iter_mut()
            .find(|record| record.uuid == booking)
            .ok_or(StoreError::NotFound)?;

        record.status = status;

        Ok(record.clone())
    }
}
