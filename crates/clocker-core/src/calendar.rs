//! Date ranges, weekdays and the holiday predicate seam.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::{DayEntry, EntryType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range end {end} is before its start {start}")]
    Reversed { start: NaiveDate, end: NaiveDate },

    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("year {year} is out of range")]
    InvalidYear { year: i32 },
}

/// Serialized shape of a range, checked by [`DateRange::new`] on the way in.
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// First to last day of a month.
    pub fn month(year: i32, month: u32) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    /// January 1st to December 31st.
    pub fn year(year: i32) -> Result<Self, RangeError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(RangeError::InvalidYear { year }),
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of dates in the range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn len_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    /// Every date in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|date| *date <= self.end)
    }
}

/// Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Source of public holidays for a region.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate, region: &str) -> bool;
}

impl<F> HolidayCalendar for F
where
    F: Fn(NaiveDate, &str) -> bool,
{
    fn is_holiday(&self, date: NaiveDate, region: &str) -> bool {
        self(date, region)
    }
}

/// The entry type a date would normally get, `None` on weekends.
pub fn suggested_entry_type<C>(date: NaiveDate, region: &str, calendar: &C) -> Option<EntryType>
where
    C: HolidayCalendar + ?Sized,
{
    if !is_weekday(date) {
        None
    } else if calendar.is_holiday(date, region) {
        Some(EntryType::Holiday)
    } else {
        Some(EntryType::Work)
    }
}

/// Dates in `range` that have no entry but would be expected to, with the
/// suggested entry type for each.
pub fn unrecorded_days<C>(
    entries: &[DayEntry],
    range: DateRange,
    region: &str,
    calendar: &C,
) -> Vec<(NaiveDate, EntryType)>
where
    C: HolidayCalendar + ?Sized,
{
    let recorded: BTreeSet<NaiveDate> = entries.iter().map(DayEntry::date).collect();
    range
        .days()
        .filter(|date| !recorded.contains(date))
        .filter_map(|date| suggested_entry_type(date, region, calendar).map(|kind| (date, kind)))
        .collect()
}
