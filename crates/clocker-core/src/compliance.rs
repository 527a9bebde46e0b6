//! Per-day and per-day-pair compliance checks.
//!
//! # Daily checks (work entries only)
//!
//! 1. Work and travel minutes are the effective minutes of their segments.
//!    An open segment makes the day incomplete.
//! 2. Break minutes are all pauses plus every idle gap between consecutive
//!    segments.
//! 3. The break rule with the highest threshold not above the work minutes
//!    decides the required break.
//! 4. Work above the daily maximum is a violation.
//! 5. Flextime delta is work minus the standard day.
//!
//! # Rest check
//!
//! Minutes from the previous work day's latest segment end to the next work
//! day's earliest start, counting whole days between the two dates.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{MINUTES_PER_DAY, format_minutes};
use crate::entry::{DayEntry, EntryType};
use crate::segment::{Effective, SegmentKind, TimeSegment};
use crate::settings::ComplianceSettings;

/// Kinds of labor rule breaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MaxHoursExceeded,
    InsufficientBreak,
    InsufficientRest,
}

impl ViolationKind {
    pub const ALL: [Self; 3] = [
        Self::MaxHoursExceeded,
        Self::InsufficientBreak,
        Self::InsufficientRest,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaxHoursExceeded => "max_hours_exceeded",
            Self::InsufficientBreak => "insufficient_break",
            Self::InsufficientRest => "insufficient_rest",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A violation attached to the day it is reported on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub date: NaiveDate,
    pub kind: ViolationKind,
    pub detail: String,
}

/// A day that could not be evaluated. Distinct from a rule violation.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationError {
    /// The day lacks data the requested check needs.
    #[error("{date}: cannot check {check}, the work day has no segments")]
    MissingData { date: NaiveDate, check: &'static str },

    /// The day still has an open-ended segment.
    #[error("{date}: day is still in progress, close the open-ended segment first")]
    IncompleteDay { date: NaiveDate },
}

impl EvaluationError {
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::MissingData { date, .. } | Self::IncompleteDay { date } => *date,
        }
    }
}

/// Outcome of the daily checks for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub total_work_minutes: u32,
    pub total_travel_minutes: u32,
    pub total_break_minutes: u32,
    pub flextime_delta_minutes: i64,
    /// Each kind at most once, with a human-readable detail.
    pub violations: BTreeMap<ViolationKind, String>,
}

impl ComplianceResult {
    const fn empty(date: NaiveDate, entry_type: EntryType) -> Self {
        Self {
            date,
            entry_type,
            total_work_minutes: 0,
            total_travel_minutes: 0,
            total_break_minutes: 0,
            flextime_delta_minutes: 0,
            violations: BTreeMap::new(),
        }
    }

    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.contains_key(&kind)
    }

    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

fn minutes(value: u32) -> String {
    format_minutes(i64::from(value))
}

/// Runs the daily checks on one entry.
///
/// Non-work entries evaluate to zero totals without violations. Their
/// flextime delta is zero, except that a flextime day debits one standard
/// day when [`ComplianceSettings::flextime_day_debit`] is set.
pub fn evaluate_day(
    entry: &DayEntry,
    settings: &ComplianceSettings,
) -> Result<ComplianceResult, EvaluationError> {
    let date = entry.date();
    let mut result = ComplianceResult::empty(date, entry.entry_type());

    match entry.entry_type() {
        EntryType::Work => {}
        EntryType::Flextime => {
            if settings.flextime_day_debit {
                result.flextime_delta_minutes = -i64::from(settings.standard_workday_minutes);
            }
            return Ok(result);
        }
        EntryType::Vacation | EntryType::Holiday | EntryType::Sick => return Ok(result),
    }

    let segments = entry.segments();
    if segments.is_empty() {
        return Err(EvaluationError::MissingData {
            date,
            check: "daily work time",
        });
    }

    for segment in segments {
        let Effective::Closed(effective) = segment.effective_minutes() else {
            return Err(EvaluationError::IncompleteDay { date });
        };
        match segment.kind {
            SegmentKind::Work => result.total_work_minutes += effective,
            SegmentKind::Travel => result.total_travel_minutes += effective,
        }
    }
    result.total_break_minutes = break_minutes(segments);

    let work = result.total_work_minutes;
    if work > settings.max_daily_minutes {
        result.violations.insert(
            ViolationKind::MaxHoursExceeded,
            format!(
                "worked {} exceeding the maximum of {}",
                minutes(work),
                minutes(settings.max_daily_minutes)
            ),
        );
    }

    if let Some(rule) = settings.break_rule_for(work) {
        if result.total_break_minutes < rule.required_break_minutes {
            result.violations.insert(
                ViolationKind::InsufficientBreak,
                format!(
                    "break of {} is less than the required {} for {} of work",
                    minutes(result.total_break_minutes),
                    minutes(rule.required_break_minutes),
                    minutes(work)
                ),
            );
        }
    }

    result.flextime_delta_minutes =
        i64::from(work) - i64::from(settings.standard_workday_minutes);
    Ok(result)
}

/// Pauses plus idle gaps between consecutive segments.
fn break_minutes(segments: &[TimeSegment]) -> u32 {
    let mut intervals: Vec<(u32, u32)> = segments.iter().map(TimeSegment::axis_interval).collect();
    intervals.sort_unstable();

    let pauses: u32 = segments.iter().map(|segment| segment.pause).sum();
    let gaps: u32 = intervals
        .windows(2)
        .map(|pair| pair[1].0.saturating_sub(pair[0].1))
        .sum();
    pauses + gaps
}

/// Checks the rest period between two work days.
///
/// Returns `Ok(None)` when either entry is not a work day or when `next` does
/// not come after `prev`. The violation is attached to `next`.
///
/// # Errors
///
/// - [`EvaluationError::MissingData`] when either work day has no segments,
///   dated on that day;
/// - [`EvaluationError::IncompleteDay`] when `prev` still has an open segment.
pub fn evaluate_rest(
    prev: &DayEntry,
    next: &DayEntry,
    settings: &ComplianceSettings,
) -> Result<Option<Violation>, EvaluationError> {
    if prev.entry_type() != EntryType::Work || next.entry_type() != EntryType::Work {
        return Ok(None);
    }
    let days_between = (next.date() - prev.date()).num_days();
    if days_between <= 0 {
        return Ok(None);
    }

    let last_end = latest_end(prev)?;
    let first_start = next
        .segments()
        .iter()
        .map(|segment| segment.start.minutes_since_midnight())
        .min()
        .ok_or(EvaluationError::MissingData {
            date: next.date(),
            check: "rest period",
        })?;

    let rest = days_between * i64::from(MINUTES_PER_DAY) + i64::from(first_start)
        - i64::from(last_end);
    let required = i64::from(settings.min_rest_minutes_between_days);
    if rest >= required {
        return Ok(None);
    }

    Ok(Some(Violation {
        date: next.date(),
        kind: ViolationKind::InsufficientRest,
        detail: format!(
            "rest period of {} after {} is less than the required {}",
            format_minutes(rest.max(0)),
            prev.date(),
            format_minutes(required)
        ),
    }))
}

/// Latest segment end on the 48 hour axis.
fn latest_end(entry: &DayEntry) -> Result<u32, EvaluationError> {
    let date = entry.date();
    let mut latest = None;
    for segment in entry.segments() {
        if segment.is_open() {
            return Err(EvaluationError::IncompleteDay { date });
        }
        let (_, end) = segment.axis_interval();
        latest = latest.max(Some(end));
    }
    latest.ok_or(EvaluationError::MissingData {
        date,
        check: "rest period",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::settings::BreakRule;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn work_entry(day: u32, segments: Vec<TimeSegment>) -> DayEntry {
        DayEntry::with_segments(date(day), EntryType::Work, segments).unwrap()
    }

    fn work(start: &str, end: &str) -> TimeSegment {
        TimeSegment::work(t(start), t(end))
    }

    #[test]
    fn test_gap_between_segments_counts_as_break() {
        let entry = work_entry(10, vec![work("08:00", "12:00"), work("13:00", "17:00")]);
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();

        assert_eq!(result.total_work_minutes, 480);
        assert_eq!(result.total_break_minutes, 60);
        assert_eq!(result.flextime_delta_minutes, 0);
        assert!(result.is_compliant());
    }

    #[test]
    fn test_gaps_are_measured_in_time_order_not_insertion_order() {
        let entry = work_entry(
            10,
            vec![work("13:00", "17:00"), work("08:00", "12:00").with_pause(10)],
        );
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_break_minutes, 70);
    }

    #[test]
    fn test_insufficient_break_for_applicable_rule() {
        let settings = ComplianceSettings {
            break_rules: vec![BreakRule::new(360, 30), BreakRule::new(540, 45)],
            ..ComplianceSettings::default()
        };
        // 08:00-16:25 minus a 25 minute pause is 480 minutes of work.
        let entry = work_entry(10, vec![work("08:00", "16:25").with_pause(25)]);
        let result = evaluate_day(&entry, &settings).unwrap();

        assert_eq!(result.total_work_minutes, 480);
        assert_eq!(result.total_break_minutes, 25);
        assert!(result.has_violation(ViolationKind::InsufficientBreak));
        insta::assert_snapshot!(
            result.violations[&ViolationKind::InsufficientBreak],
            @"break of 25m is less than the required 30m for 8h 0m of work"
        );
    }

    #[test]
    fn test_no_break_required_below_lowest_threshold() {
        let entry = work_entry(10, vec![work("09:00", "15:00")]);
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_work_minutes, 360);
        // Exactly at the 6 hour threshold a break is required.
        assert!(result.has_violation(ViolationKind::InsufficientBreak));

        let entry = work_entry(10, vec![work("09:00", "14:59")]);
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert!(result.is_compliant());
    }

    #[test]
    fn test_extended_break_needed_after_nine_hours() {
        let entry = work_entry(10, vec![work("08:00", "17:45").with_pause(45)]);
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_work_minutes, 540);
        assert!(result.is_compliant());

        let entry = work_entry(10, vec![work("08:00", "17:40").with_pause(40)]);
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert!(result.has_violation(ViolationKind::InsufficientBreak));
    }

    #[test]
    fn test_max_hours_is_strictly_greater() {
        let at_limit = work_entry(10, vec![work("07:00", "17:45").with_pause(45)]);
        let result = evaluate_day(&at_limit, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_work_minutes, 600);
        assert!(!result.has_violation(ViolationKind::MaxHoursExceeded));

        let over = work_entry(10, vec![work("07:00", "19:00").with_pause(60)]);
        let result = evaluate_day(&over, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_work_minutes, 660);
        assert_eq!(result.flextime_delta_minutes, 180);
        insta::assert_snapshot!(
            result.violations[&ViolationKind::MaxHoursExceeded],
            @"worked 11h 0m exceeding the maximum of 10h 0m"
        );
    }

    #[test]
    fn test_travel_is_tracked_separately_from_work() {
        let entry = work_entry(
            10,
            vec![
                TimeSegment::travel(t("07:00"), t("08:00")),
                work("08:00", "16:30").with_pause(30),
            ],
        );
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_work_minutes, 480);
        assert_eq!(result.total_travel_minutes, 60);
        assert_eq!(result.total_break_minutes, 30);
    }

    #[test]
    fn test_night_shift_over_midnight() {
        let entry = work_entry(10, vec![work("22:00", "06:30").with_pause(30)]);
        let result = evaluate_day(&entry, &ComplianceSettings::default()).unwrap();
        assert_eq!(result.total_work_minutes, 480);
        assert!(result.is_compliant());
    }

    #[test]
    fn test_open_segment_makes_day_incomplete() {
        let entry = work_entry(10, vec![work("08:00", "12:00"), TimeSegment::open(t("13:00"))]);
        assert_eq!(
            evaluate_day(&entry, &ComplianceSettings::default()),
            Err(EvaluationError::IncompleteDay { date: date(10) })
        );
    }

    #[test]
    fn test_work_day_without_segments_is_missing_data() {
        let entry = DayEntry::new(date(10), EntryType::Work);
        let err = evaluate_day(&entry, &ComplianceSettings::default()).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"2025-03-10: cannot check daily work time, the work day has no segments"
        );
    }

    #[test]
    fn test_absence_days_are_neutral() {
        let settings = ComplianceSettings::default();
        for entry_type in [
            EntryType::Flextime,
            EntryType::Vacation,
            EntryType::Holiday,
            EntryType::Sick,
        ] {
            let result = evaluate_day(&DayEntry::new(date(10), entry_type), &settings).unwrap();
            assert_eq!(result.flextime_delta_minutes, 0, "{entry_type}");
            assert_eq!(result.total_work_minutes, 0);
            assert!(result.is_compliant());
        }
    }

    #[test]
    fn test_flextime_day_debit_is_opt_in() {
        let settings = ComplianceSettings {
            flextime_day_debit: true,
            ..ComplianceSettings::default()
        };
        let flex = DayEntry::new(date(10), EntryType::Flextime);
        assert_eq!(evaluate_day(&flex, &settings).unwrap().flextime_delta_minutes, -480);

        let vacation = DayEntry::new(date(10), EntryType::Vacation);
        assert_eq!(evaluate_day(&vacation, &settings).unwrap().flextime_delta_minutes, 0);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let entry = work_entry(10, vec![work("06:00", "12:00"), work("12:10", "18:00")]);
        let settings = ComplianceSettings::default();
        let first = evaluate_day(&entry, &settings).unwrap();
        let second = evaluate_day(&entry, &settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_rest_between_consecutive_days() {
        let d1 = work_entry(10, vec![work("14:00", "22:00")]);
        let d2 = work_entry(11, vec![work("06:00", "14:00")]);
        let violation = evaluate_rest(&d1, &d2, &ComplianceSettings::default())
            .unwrap()
            .unwrap();

        assert_eq!(violation.date, date(11));
        assert_eq!(violation.kind, ViolationKind::InsufficientRest);
        insta::assert_snapshot!(
            violation.detail,
            @"rest period of 8h 0m after 2025-03-10 is less than the required 11h 0m"
        );
    }

    #[test]
    fn test_rest_exactly_at_minimum_is_fine() {
        let d1 = work_entry(10, vec![work("08:00", "19:00")]);
        let d2 = work_entry(11, vec![work("06:00", "10:00")]);
        assert_eq!(
            evaluate_rest(&d1, &d2, &ComplianceSettings::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_rest_accounts_for_shift_past_midnight() {
        // Ends 02:00 on the 11th, next start 08:00 on the 11th: six hours.
        let d1 = work_entry(10, vec![work("18:00", "02:00")]);
        let d2 = work_entry(11, vec![work("08:00", "12:00")]);
        let violation = evaluate_rest(&d1, &d2, &ComplianceSettings::default())
            .unwrap()
            .unwrap();
        assert!(violation.detail.starts_with("rest period of 6h 0m"));
    }

    #[test]
    fn test_rest_uses_latest_end_and_earliest_start() {
        let d1 = work_entry(10, vec![work("20:00", "23:00"), work("08:00", "12:00")]);
        let d2 = work_entry(11, vec![work("13:00", "17:00"), work("09:00", "12:00")]);
        // 23:00 -> 09:00 is ten hours.
        assert!(
            evaluate_rest(&d1, &d2, &ComplianceSettings::default())
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_rest_across_a_gap_of_days() {
        let d1 = work_entry(7, vec![work("14:00", "23:30")]);
        let d2 = work_entry(10, vec![work("06:00", "14:00")]);
        assert_eq!(
            evaluate_rest(&d1, &d2, &ComplianceSettings::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_rest_ignores_non_work_days_and_wrong_order() {
        let settings = ComplianceSettings::default();
        let d1 = work_entry(10, vec![work("14:00", "22:00")]);
        let d2 = work_entry(11, vec![work("06:00", "14:00")]);
        let sick = DayEntry::new(date(11), EntryType::Sick);

        assert_eq!(evaluate_rest(&d1, &sick, &settings), Ok(None));
        assert_eq!(evaluate_rest(&d2, &d1, &settings), Ok(None));
    }

    #[test]
    fn test_rest_after_open_day_is_incomplete() {
        let d1 = work_entry(10, vec![TimeSegment::open(t("14:00"))]);
        let d2 = work_entry(11, vec![work("06:00", "14:00")]);
        assert_eq!(
            evaluate_rest(&d1, &d2, &ComplianceSettings::default()),
            Err(EvaluationError::IncompleteDay { date: date(10) })
        );
    }

    #[test]
    fn test_rest_next_to_empty_work_day_is_missing_data() {
        let settings = ComplianceSettings::default();
        let empty_prev = DayEntry::new(date(9), EntryType::Work);
        let worked = work_entry(10, vec![work("08:00", "16:00")]);
        let empty_next = DayEntry::new(date(11), EntryType::Work);

        assert_eq!(
            evaluate_rest(&worked, &empty_next, &settings),
            Err(EvaluationError::MissingData {
                date: date(11),
                check: "rest period",
            })
        );
        assert_eq!(
            evaluate_rest(&empty_prev, &worked, &settings),
            Err(EvaluationError::MissingData {
                date: date(9),
                check: "rest period",
            })
        );
    }
}
