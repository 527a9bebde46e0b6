//! Period statistics.
//!
//! Entries are sorted by date first. Days are evaluated independently in
//! parallel; the rest check then walks the sorted days in order, because it
//! depends on which day comes before which.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::calendar::DateRange;
use crate::compliance::{
    ComplianceResult, EvaluationError, Violation, ViolationKind, evaluate_day, evaluate_rest,
};
use crate::entry::{DayEntry, EntryType};
use crate::settings::{ComplianceSettings, RestPolicy};

/// Days per entry type over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub work: u32,
    pub flextime: u32,
    pub vacation: u32,
    pub holiday: u32,
    pub sick: u32,
    /// Dates in range with no entry at all.
    pub unrecorded: u32,
    /// Days with at least one travel segment.
    pub travel_days: u32,
}

impl EntryCounts {
    pub const fn get(&self, entry_type: EntryType) -> u32 {
        match entry_type {
            EntryType::Work => self.work,
            EntryType::Flextime => self.flextime,
            EntryType::Vacation => self.vacation,
            EntryType::Holiday => self.holiday,
            EntryType::Sick => self.sick,
        }
    }

    fn record(&mut self, entry_type: EntryType) {
        let slot = match entry_type {
            EntryType::Work => &mut self.work,
            EntryType::Flextime => &mut self.flextime,
            EntryType::Vacation => &mut self.vacation,
            EntryType::Holiday => &mut self.holiday,
            EntryType::Sick => &mut self.sick,
        };
        *slot += 1;
    }

    /// Days that have an entry.
    pub const fn recorded(&self) -> u32 {
        self.work + self.flextime + self.vacation + self.holiday + self.sick
    }
}

/// Aggregate statistics for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStatistics {
    pub range: DateRange,
    pub entry_counts: EntryCounts,
    pub total_work_minutes: u64,
    pub total_travel_minutes: u64,
    pub flextime_balance_minutes: i64,
    /// Every kind is present, zero when it never occurred.
    pub violation_counts: BTreeMap<ViolationKind, u32>,
    /// Chronological list of violations.
    pub violations: Vec<Violation>,
    /// Days that could not be evaluated.
    pub issues: Vec<EvaluationError>,
}

impl PeriodStatistics {
    fn empty(range: DateRange) -> Self {
        Self {
            range,
            entry_counts: EntryCounts::default(),
            total_work_minutes: 0,
            total_travel_minutes: 0,
            flextime_balance_minutes: 0,
            violation_counts: ViolationKind::ALL.into_iter().map(|kind| (kind, 0)).collect(),
            violations: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn violation_total(&self) -> u32 {
        self.violation_counts.values().sum()
    }

    fn absorb(&mut self, result: ComplianceResult) {
        self.total_work_minutes += u64::from(result.total_work_minutes);
        self.total_travel_minutes += u64::from(result.total_travel_minutes);
        self.flextime_balance_minutes += result.flextime_delta_minutes;
        for (kind, detail) in result.violations {
            *self.violation_counts.entry(kind).or_default() += 1;
            self.violations.push(Violation {
                date: result.date,
                kind,
                detail,
            });
        }
    }
}

/// Computes statistics for the entries falling inside `range`.
///
/// Input order does not matter. If two entries share a date, the one later
/// in the input is used.
pub fn aggregate(
    entries: &[DayEntry],
    settings: &ComplianceSettings,
    range: DateRange,
) -> PeriodStatistics {
    let by_date: BTreeMap<NaiveDate, &DayEntry> = entries
        .iter()
        .filter(|entry| range.contains(entry.date()))
        .map(|entry| (entry.date(), entry))
        .collect();
    let days: Vec<&DayEntry> = by_date.into_values().collect();

    let evaluated: Vec<Result<ComplianceResult, EvaluationError>> = days
        .par_iter()
        .map(|entry| evaluate_day(entry, settings))
        .collect();

    let mut stats = PeriodStatistics::empty(range);
    let mut last_day: Option<&DayEntry> = None;
    let mut last_work_day: Option<&DayEntry> = None;

    for (entry, outcome) in days.iter().copied().zip(evaluated) {
        stats.entry_counts.record(entry.entry_type());
        if entry.has_travel() {
            stats.entry_counts.travel_days += 1;
        }

        let mut result = match outcome {
            Ok(result) => result,
            Err(err) => {
                stats.issues.push(err);
                last_day = None;
                last_work_day = None;
                continue;
            }
        };

        let previous = match settings.rest_policy {
            RestPolicy::Calendar => {
                last_day.filter(|prev| prev.date().succ_opt() == Some(entry.date()))
            }
            RestPolicy::SkipNonWork => last_work_day,
        };
        if let Some(prev) = previous {
            match evaluate_rest(prev, entry, settings) {
                Ok(Some(violation)) => {
                    result.violations.insert(violation.kind, violation.detail);
                }
                Ok(None) => {}
                Err(err) => stats.issues.push(err),
            }
        }

        stats.absorb(result);
        last_day = Some(entry);
        if entry.entry_type() == EntryType::Work {
            last_work_day = Some(entry);
        }
    }

    stats.entry_counts.unrecorded = range.len_days() - stats.entry_counts.recorded();
    stats
}
