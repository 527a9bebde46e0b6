//! Day entries and their mutation lifecycle.
//!
//! A [`DayEntry`] can only be changed through its methods. Each mutation
//! builds the full candidate segment list, validates it, and commits it only
//! if validation passes, so a rejected edit leaves the entry untouched.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::segment::{SegmentKind, TimeSegment};
use crate::validate::{ValidationError, validate_segments};

/// What kind of day an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Work,
    Flextime,
    Vacation,
    Holiday,
    Sick,
}

impl EntryType {
    pub const ALL: [Self; 5] = [
        Self::Work,
        Self::Flextime,
        Self::Vacation,
        Self::Holiday,
        Self::Sick,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Flextime => "flextime",
            Self::Vacation => "vacation",
            Self::Holiday => "holiday",
            Self::Sick => "sick",
        }
    }

    /// Whether entries of this type may hold segments.
    pub const fn accepts_segments(&self) -> bool {
        match self {
            Self::Work => true,
            Self::Flextime | Self::Vacation | Self::Holiday | Self::Sick => false,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partial change to one segment. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentUpdate {
    pub kind: Option<SegmentKind>,
    pub start: Option<ClockTime>,
    /// `Some(None)` reopens the segment.
    pub end: Option<Option<ClockTime>>,
    pub pause: Option<u32>,
}

impl SegmentUpdate {
    fn apply(self, segment: TimeSegment) -> TimeSegment {
        TimeSegment {
            kind: self.kind.unwrap_or(segment.kind),
            start: self.start.unwrap_or(segment.start),
            end: self.end.unwrap_or(segment.end),
            pause: self.pause.unwrap_or(segment.pause),
        }
    }
}

/// Serialized shape of a day entry, validated on the way in.
#[derive(Deserialize)]
struct RawDayEntry {
    date: NaiveDate,
    #[serde(rename = "type")]
    entry_type: EntryType,
    #[serde(default)]
    segments: Vec<TimeSegment>,
}

impl TryFrom<RawDayEntry> for DayEntry {
    type Error = ValidationError;

    fn try_from(raw: RawDayEntry) -> Result<Self, Self::Error> {
        Self::with_segments(raw.date, raw.entry_type, raw.segments)
    }
}

/// One calendar day's record.
///
/// Invariants held by every value:
/// - segments are empty unless the entry type is [`EntryType::Work`];
/// - segments do not overlap;
/// - at most one segment is open-ended, and it is a work segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDayEntry")]
pub struct DayEntry {
    date: NaiveDate,
    #[serde(rename = "type")]
    entry_type: EntryType,
    segments: Vec<TimeSegment>,
}

impl DayEntry {
    /// Creates an entry without segments.
    pub const fn new(date: NaiveDate, entry_type: EntryType) -> Self {
        Self {
            date,
            entry_type,
            segments: Vec::new(),
        }
    }

    /// Creates an entry with an initial segment set.
    pub fn with_segments(
        date: NaiveDate,
        entry_type: EntryType,
        segments: Vec<TimeSegment>,
    ) -> Result<Self, ValidationError> {
        let mut entry = Self::new(date, entry_type);
        entry.commit(segments)?;
        Ok(entry)
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Segments in insertion order.
    pub fn segments(&self) -> &[TimeSegment] {
        &self.segments
    }

    pub fn has_open_segment(&self) -> bool {
        self.segments.iter().any(TimeSegment::is_open)
    }

    pub fn has_travel(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.kind == SegmentKind::Travel)
    }

    /// Appends a segment and returns its index.
    pub fn add_segment(&mut self, segment: TimeSegment) -> Result<usize, ValidationError> {
        let mut candidate = self.segments.clone();
        candidate.push(segment);
        self.commit(candidate)?;
        Ok(self.segments.len() - 1)
    }

    /// Changes fields of the segment at `index`.
    pub fn update_segment(
        &mut self,
        index: usize,
        update: SegmentUpdate,
    ) -> Result<(), ValidationError> {
        let current = *self.segment_at(index)?;
        let mut candidate = self.segments.clone();
        candidate[index] = update.apply(current);
        self.commit(candidate)
    }

    /// Removes and returns the segment at `index`.
    pub fn remove_segment(&mut self, index: usize) -> Result<TimeSegment, ValidationError> {
        let removed = *self.segment_at(index)?;
        let mut candidate = self.segments.clone();
        candidate.remove(index);
        self.commit(candidate)?;
        Ok(removed)
    }

    /// Drops every segment, returning them.
    pub fn clear_segments(&mut self) -> Vec<TimeSegment> {
        std::mem::take(&mut self.segments)
    }

    /// Changes the entry type.
    ///
    /// Moving away from work while segments exist is rejected rather than
    /// silently discarding them; call [`Self::clear_segments`] first.
    pub fn set_entry_type(&mut self, entry_type: EntryType) -> Result<(), ValidationError> {
        if !entry_type.accepts_segments() && !self.segments.is_empty() {
            return Err(ValidationError::TypeChangeOrphansSegments {
                to: entry_type,
                count: self.segments.len(),
            });
        }
        self.entry_type = entry_type;
        Ok(())
    }

    fn segment_at(&self, index: usize) -> Result<&TimeSegment, ValidationError> {
        self.segments
            .get(index)
            .ok_or(ValidationError::NoSuchSegment {
                index,
                len: self.segments.len(),
            })
    }

    /// Validates `candidate` against every invariant and stores it on success.
    fn commit(&mut self, candidate: Vec<TimeSegment>) -> Result<(), ValidationError> {
        if !candidate.is_empty() && !self.entry_type.accepts_segments() {
            return Err(ValidationError::NotWorkEntry {
                entry_type: self.entry_type,
            });
        }
        validate_segments(&candidate)?;
        self.segments = candidate;
        Ok(())
    }
}
