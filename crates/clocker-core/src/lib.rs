//! Validation and labor-compliance engine for daily work entries.
//!
//! This crate contains the fundamental types and logic for:
//! - Time arithmetic: clock times, spans across midnight, pause durations
//! - Validation: segment shape, overlap and open-end rules for one day
//! - Day entries: the entry model and its all-or-nothing mutation API
//! - Compliance: daily work/break limits and rest periods between days
//! - Statistics: period totals, flextime balance and violation counts
//!
//! The engine performs no I/O and never logs. Storage, configuration loading
//! and presentation belong to the caller.

pub mod calendar;
pub mod clock;
mod compliance;
mod entry;
mod segment;
mod settings;
mod stats;
mod validate;

pub use calendar::{DateRange, HolidayCalendar, RangeError};
pub use clock::{ClockParseError, ClockTime, format_minutes, parse_pause, span_minutes};
pub use compliance::{
    ComplianceResult, EvaluationError, Violation, ViolationKind, evaluate_day, evaluate_rest,
};
pub use entry::{DayEntry, EntryType, SegmentUpdate};
pub use segment::{Effective, SegmentKind, ShapeError, TimeSegment};
pub use settings::{BreakRule, ComplianceSettings, ConfigurationError, RestPolicy};
pub use stats::{EntryCounts, PeriodStatistics, aggregate};
pub use validate::{ValidationError, validate_segments};
