//! Slots
//!
//! A field is booked in one-hour slots between its opening and closing hour.

use std::fmt;

use jiff::{
    Timestamp, ToSpan,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use thiserror::Error;

/// Errors raised while building slots.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// Hour outside `0..=23`.
    #[error("hour {0} is not between 0 and 23")]
    HourOutOfRange(i8),

    /// Hour the field is closed.
    #[error("{hour}:00 is outside opening hours {open}:00-{close}:00")]
    OutsideOpeningHours {
        /// Requested start hour
        hour: i8,
        /// Opening hour
        open: i8,
        /// Closing hour
        close: i8,
    },

    /// Opening hours that do not form an interval inside one day.
    #[error("invalid opening hours {open}:00-{close}:00")]
    InvalidOpeningHours {
        /// Opening hour
        open: i8,
        /// Closing hour
        close: i8,
    },

    /// Unreadable slot start such as `"1pm"`.
    #[error("invalid slot start: {0}")]
    InvalidStart(String),

    /// A selection needs at least one slot.
    #[error("no slots selected")]
    Empty,

    /// Date arithmetic left the supported range.
    #[error("slot on {0} cannot be represented")]
    OutOfRange(Date),
}

/// One bookable hour on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    date: Date,
    hour: i8,
}

impl TimeSlot {
    /// Slot starting at `hour:00` on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::HourOutOfRange`] unless `hour` is in `0..=23`.
    pub fn new(date: Date, hour: i8) -> Result<Self, SlotError> {
        if !(0..=23).contains(&hour) {
            return Err(SlotError::HourOutOfRange(hour));
        }

        Ok(Self { date, hour })
    }

    /// Date of the slot.
    pub const fn date(&self) -> Date {
        self.date
    }

    /// Start hour.
    pub const fn hour(&self) -> i8 {
        self.hour
    }

    /// Civil start time.
    pub fn start(&self) -> DateTime {
        self.date.at(self.hour, 0, 0, 0)
    }

    /// Civil end time; the 23:00 slot ends at midnight the next day.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] on the last representable date.
    pub fn end(&self) -> Result<DateTime, SlotError> {
        self.start()
            .checked_add(1.hour())
            .map_err(|_err| SlotError::OutOfRange(self.date))
    }

    /// Start instant in `tz`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if the instant cannot be represented.
    pub fn start_in(&self, tz: &TimeZone) -> Result<Timestamp, SlotError> {
        to_timestamp(self.start(), tz, self.date)
    }

    /// End instant in `tz`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if the instant cannot be represented.
    pub fn end_in(&self, tz: &TimeZone) -> Result<Timestamp, SlotError> {
        to_timestamp(self.end()?, tz, self.date)
    }

    /// `"13:00 - 14:00"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

fn to_timestamp(datetime: DateTime, tz: &TimeZone, date: Date) -> Result<Timestamp, SlotError> {
    datetime
        .to_zoned(tz.clone())
        .map(|zoned| zoned.timestamp())
        .map_err(|_err| SlotError::OutOfRange(date))
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00 - {:02}:00", self.hour, (self.hour + 1) % 24)
    }
}

/// Read a slot start hour from `"13"` or `"13:00"`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidStart`] for anything else, including starts
/// that are not on the hour.
pub fn parse_start_hour(raw: &str) -> Result<i8, SlotError> {
    let raw = raw.trim();
    let invalid = || SlotError::InvalidStart(raw.to_string());

    let (hour, minutes) = raw.split_once(':').unwrap_or((raw, "00"));

    if minutes != "00" {
        return Err(invalid());
    }

    let hour = hour.parse::<i8>().map_err(|_err| invalid())?;

    if !(0..=23).contains(&hour) {
        return Err(SlotError::HourOutOfRange(hour));
    }

    Ok(hour)
}

/// Daily opening hours, `open` inclusive and `close` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    open: i8,
    close: i8,
}

impl Default for OpeningHours {
    /// 13:00 until midnight.
    fn default() -> Self {
        Self { open: 13, close: 24 }
    }
}

impl OpeningHours {
    /// Create opening hours.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidOpeningHours`] unless `0 <= open < close <= 24`.
    pub fn new(open: i8, close: i8) -> Result<Self, SlotError> {
        if open < 0 || close > 24 || open >= close {
            return Err(SlotError::InvalidOpeningHours { open, close });
        }

        Ok(Self { open, close })
    }

    /// Opening hour.
    pub const fn open(&self) -> i8 {
        self.open
    }

    /// Closing hour.
    pub const fn close(&self) -> i8 {
        self.close
    }

    /// Whether a slot may start at `hour`.
    pub fn contains(&self, hour: i8) -> bool {
        (self.open..self.close).contains(&hour)
    }

    /// Every slot of `date`, in order.
    pub fn slots(&self, date: Date) -> Vec<TimeSlot> {
        (self.open..self.close)
            .map(|hour| TimeSlot { date, hour })
            .collect()
    }

    /// Slot at `hour` on `date`, if the field is open then.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutsideOpeningHours`] when closed at that hour.
    pub fn slot(&self, date: Date, hour: i8) -> Result<TimeSlot, SlotError> {
        if !self.contains(hour) {
            return Err(SlotError::OutsideOpeningHours {
                hour,
                open: self.open,
                close: self.close,
            });
        }

        TimeSlot::new(date, hour)
    }
}

/// An ordered, duplicate-free set of selected slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSelection(SmallVec<[TimeSlot; 12]>);

impl SlotSelection {
    /// Build a selection; order and duplicates in `slots` do not matter.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Empty`] when no slot is given.
    pub fn new(slots: impl IntoIterator<Item = TimeSlot>) -> Result<Self, SlotError> {
        let mut slots: SmallVec<[TimeSlot; 12]> = slots.into_iter().collect();

        slots.sort_unstable();
        slots.dedup();

        if slots.is_empty() {
            return Err(SlotError::Empty);
        }

        Ok(Self(slots))
    }

    /// Number of slots (hours).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no slot is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeSlot> {
        self.0.iter()
    }

    /// Whether `slot` is selected.
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.0.binary_search(slot).is_ok()
    }

    /// Whether every slot starts when the previous one ends.
    pub fn is_contiguous(&self) -> bool {
        self.0.windows(2).all(|pair| match pair {
            [previous, next] => previous.end().is_ok_and(|end| end == next.start()),
            _ => true,
        })
    }

    /// Start of the first slot and end of the last one.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if the last slot cannot end.
    pub fn span(&self) -> Result<(DateTime, DateTime), SlotError> {
        let (Some(first), Some(last)) = (self.0.first(), self.0.last()) else {
            return Err(SlotError::Empty);
        };

        Ok((first.start(), last.end()?))
    }

    /// `"HH:00 - HH:00"` labels in order.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(TimeSlot::label).collect()
    }
}

impl<'a> IntoIterator for &'a SlotSelection {
    type Item = &'a TimeSlot;
    type IntoIter = std::slice::Iter<'a, TimeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Whether a slot is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    /// The slot.
    pub slot: TimeSlot,

    /// Whether a booking already holds it.
    pub booked: bool,
}

/// Mark which of `slots` appear in `booked`.
pub fn availability(slots: &[TimeSlot], booked: &[TimeSlot]) -> Vec<SlotAvailability> {
    let booked: FxHashSet<&TimeSlot> = booked.iter().collect();

    slots
        .iter()
        .map(|slot| SlotAvailability {
            slot: *slot,
            booked: booked.contains(slot),
        })
        .collect()
}
