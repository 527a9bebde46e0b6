//! Set-wide validation of a day's time segments.
//!
//! The validator always sees the complete proposed set. Overlap and the
//! single-open-end rule are properties of the whole collection, so checking
//! only the segment being edited would miss conflicts.

use thiserror::Error;

use crate::entry::EntryType;
use crate::segment::{ShapeError, TimeSegment};

/// Errors rejecting a day entry or a mutation of it.
///
/// Every variant is recoverable by correcting the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One segment is malformed on its own.
    #[error("segment {index} is invalid: {source}")]
    InvalidSegment {
        index: usize,
        #[source]
        source: ShapeError,
    },

    /// More than one segment lacks an end time.
    #[error(
        "multiple open-ended segments: set an end time for the segment starting at {first_start} or {second_start}"
    )]
    MultipleOpenEnded {
        first: usize,
        second: usize,
        first_start: String,
        second_start: String,
    },

    /// Two segments share time with positive length.
    #[error("segments overlap: {first_range} overlaps with {second_range}")]
    Overlap {
        first: usize,
        second: usize,
        first_range: String,
        second_range: String,
    },

    /// Only work entries carry segments.
    #[error("cannot record segments on a {entry_type} entry, only work entries accept segments")]
    NotWorkEntry { entry_type: EntryType },

    /// Changing the entry type would leave segments on a non-work entry.
    #[error(
        "changing the entry type to {to} would orphan {count} segment(s), clear them first"
    )]
    TypeChangeOrphansSegments { to: EntryType, count: usize },

    /// A segment index outside the entry's segment list.
    #[error("no segment at index {index}, the entry has {len}")]
    NoSuchSegment { index: usize, len: usize },
}

/// Validates a candidate set of segments for one day.
///
/// 1. every segment passes its own shape check;
/// 2. at most one segment is open-ended;
/// 3. no two segments overlap on the 48 hour axis, where touching endpoints
///    are allowed and open segments reach the end of the axis.
pub fn validate_segments(segments: &[TimeSegment]) -> Result<(), ValidationError> {
    for (index, segment) in segments.iter().enumerate() {
        segment
            .check_shape()
            .map_err(|source| ValidationError::InvalidSegment { index, source })?;
    }

    let mut open = segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_open());
    if let (Some((first, a)), Some((second, b))) = (open.next(), open.next()) {
        return Err(ValidationError::MultipleOpenEnded {
            first,
            second,
            first_start: a.start.to_string(),
            second_start: b.start.to_string(),
        });
    }

    if let Some((first, second)) = find_overlap(segments) {
        return Err(ValidationError::Overlap {
            first,
            second,
            first_range: segments[first].to_string(),
            second_range: segments[second].to_string(),
        });
    }

    Ok(())
}

/// Returns the input indices of one overlapping pair, lower index first.
fn find_overlap(segments: &[TimeSegment]) -> Option<(usize, usize)> {
    let mut intervals: Vec<(u32, u32, usize)> = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let (start, end) = segment.axis_interval();
            (start, end, index)
        })
        .collect();
    intervals.sort_unstable();

    // Furthest end seen so far and the segment that owns it.
    let mut reach: Option<(u32, usize)> = None;
    for (start, end, index) in intervals {
        if let Some((reach_end, owner)) = reach {
            if start < reach_end {
                return Some((owner.min(index), owner.max(index)));
            }
        }
        if reach.is_none_or(|(reach_end, _)| end > reach_end) {
            reach = Some((end, index));
        }
    }
    None
}
