//! Time segments: one work or travel interval within a day.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{self, ClockTime, MINUTES_PER_DAY, span_minutes};

/// End of the doubled 48 hour axis used for ordering and overlap checks.
pub(crate) const AXIS_END: u32 = 2 * MINUTES_PER_DAY;

/// What a segment was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Work,
    Travel,
}

impl SegmentKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Travel => "travel",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Violations of a single segment's own shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Only work segments may be left open.
    #[error("{kind} segment starting at {start} must have an end time, only work can be open-ended")]
    OpenNonWork { kind: SegmentKind, start: ClockTime },

    /// Start and end are the same clock time.
    #[error("segment {start}-{start} has no duration")]
    ZeroSpan { start: ClockTime },

    /// The pause swallows the whole segment.
    #[error("pause of {pause}m must be shorter than the segment span of {span}m")]
    PauseTooLong { pause: u32, span: u32 },
}

/// Length of a segment after the pause is taken off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effective {
    /// Minutes actually spent.
    Closed(u32),
    /// The segment has no end yet.
    Open,
}

/// One interval within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    pub kind: SegmentKind,
    pub start: ClockTime,
    /// `None` while the segment is still running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ClockTime>,
    /// Pause taken inside the segment, in minutes.
    #[serde(default, deserialize_with = "clock::deserialize_pause")]
    pub pause: u32,
}

impl TimeSegment {
    pub const fn work(start: ClockTime, end: ClockTime) -> Self {
        Self {
            kind: SegmentKind::Work,
            start,
            end: Some(end),
            pause: 0,
        }
    }

    pub const fn travel(start: ClockTime, end: ClockTime) -> Self {
        Self {
            kind: SegmentKind::Travel,
            start,
            end: Some(end),
            pause: 0,
        }
    }

    /// A work segment that has started but not ended.
    pub const fn open(start: ClockTime) -> Self {
        Self {
            kind: SegmentKind::Work,
            start,
            end: None,
            pause: 0,
        }
    }

    #[must_use]
    pub const fn with_pause(mut self, pause: u32) -> Self {
        self.pause = pause;
        self
    }

    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Raw span before the pause, `None` for open segments.
    pub fn span_minutes(&self) -> Option<u32> {
        self.end.map(|end| span_minutes(self.start, end))
    }

    /// Span minus pause.
    pub fn effective_minutes(&self) -> Effective {
        self.span_minutes()
            .map_or(Effective::Open, |span| Effective::Closed(span.saturating_sub(self.pause)))
    }

    /// Effective minutes, measuring an open segment up to `now`.
    ///
    /// Substituting the current time is a caller decision; compliance
    /// evaluation never does it.
    pub fn effective_minutes_until(&self, now: ClockTime) -> u32 {
        let span = self
            .span_minutes()
            .unwrap_or_else(|| span_minutes(self.start, now));
        span.saturating_sub(self.pause)
    }

    /// Checks the start/end/pause relationship of this segment alone.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        let Some(span) = self.span_minutes() else {
            return match self.kind {
                SegmentKind::Work => Ok(()),
                SegmentKind::Travel => Err(ShapeError::OpenNonWork {
                    kind: self.kind,
                    start: self.start,
                }),
            };
        };
        if span == 0 {
            return Err(ShapeError::ZeroSpan { start: self.start });
        }
        if self.pause >= span {
            return Err(ShapeError::PauseTooLong {
                pause: self.pause,
                span,
            });
        }
        Ok(())
    }

    /// Position on the 48 hour axis as a half-open `[start, end)` pair.
    ///
    /// Segments crossing midnight extend past 1440 instead of wrapping; open
    /// segments run to the end of the axis.
    pub(crate) fn axis_interval(&self) -> (u32, u32) {
        let start = self.start.minutes_since_midnight();
        let end = self
            .span_minutes()
            .map_or(AXIS_END, |span| start + span);
        (start, end)
    }
}

impl fmt::Display for TimeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{} {}-{}", self.kind, self.start, end)?,
            None => write!(f, "{} {}-open", self.kind, self.start)?,
        }
        if self.pause > 0 {
            write!(f, " (pause {})", clock::format_minutes(i64::from(self.pause)))?;
        }
        Ok(())
    }
}
