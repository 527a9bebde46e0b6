//! Stats command: period totals, flextime balance and violations.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clocker_core::calendar::unrecorded_days;
use clocker_core::{
    DateRange, DayEntry, EntryType, PeriodStatistics, ViolationKind, aggregate, format_minutes,
};
use serde::Serialize;

use super::util;
use crate::{Config, StatsArgs};

/// Entries listed before the missing-entries section is cut short.
const MAX_MISSING_SHOWN: usize = 10;

// ========== Period Selection ==========

/// Resolves the requested period.
///
/// Without an explicit period the range spans the earliest to the latest
/// entry, or the month containing `today` when there are no entries.
pub fn resolve_range(
    args: &StatsArgs,
    entries: &[DayEntry],
    today: NaiveDate,
) -> Result<DateRange> {
    if let Some(month) = &args.month {
        let (year, month) = util::parse_month(month)?;
        return Ok(DateRange::month(year, month)?);
    }
    if let Some(year) = args.year {
        return Ok(DateRange::year(year)?);
    }
    if let (Some(from), Some(to)) = (args.from, args.to) {
        return Ok(DateRange::new(from, to)?);
    }

    let first = entries.iter().map(DayEntry::date).min();
    let last = entries.iter().map(DayEntry::date).max();
    match (first, last) {
        (Some(first), Some(last)) => Ok(DateRange::new(first, last)?),
        _ => Ok(DateRange::month(today.year(), today.month())?),
    }
}

// ========== Report Generation ==========

/// A workday in the period with no entry, and what it would usually be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingEntry {
    pub date: NaiveDate,
    pub suggested: EntryType,
}

fn heading<W: Write>(writer: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "─".repeat(title.chars().count()))
}

fn signed(minutes: i64) -> String {
    if minutes > 0 {
        format!("+{}", format_minutes(minutes))
    } else {
        format_minutes(minutes)
    }
}

/// Writes the human-readable report.
pub fn write_report<W: Write>(
    writer: &mut W,
    stats: &PeriodStatistics,
    missing: &[MissingEntry],
) -> std::io::Result<()> {
    writeln!(
        writer,
        "STATISTICS: {} to {}",
        stats.range.start(),
        stats.range.end()
    )?;

    heading(writer, "DAYS")?;
    for entry_type in EntryType::ALL {
        writeln!(
            writer,
            "  {:<12} {}",
            entry_type.as_str(),
            stats.entry_counts.get(entry_type)
        )?;
    }
    writeln!(writer, "  {:<12} {}", "unrecorded", stats.entry_counts.unrecorded)?;
    writeln!(writer, "  {:<12} {}", "travel days", stats.entry_counts.travel_days)?;

    heading(writer, "TIME")?;
    writeln!(
        writer,
        "  {:<10} {}",
        "Work:",
        format_minutes(i64::try_from(stats.total_work_minutes).unwrap_or(i64::MAX))
    )?;
    writeln!(
        writer,
        "  {:<10} {}",
        "Travel:",
        format_minutes(i64::try_from(stats.total_travel_minutes).unwrap_or(i64::MAX))
    )?;
    writeln!(
        writer,
        "  {:<10} {}",
        "Flextime:",
        signed(stats.flextime_balance_minutes)
    )?;

    heading(writer, &format!("VIOLATIONS ({})", stats.violation_total()))?;
    for kind in ViolationKind::ALL {
        let count = stats.violation_counts.get(&kind).copied().unwrap_or(0);
        writeln!(writer, "  {:<20} {count}", kind.as_str())?;
    }
    if !stats.violations.is_empty() {
        writeln!(writer)?;
        for violation in &stats.violations {
            writeln!(
                writer,
                "  {}  {:<18}  {}",
                violation.date,
                violation.kind.as_str(),
                violation.detail
            )?;
        }
    }

    if !stats.issues.is_empty() {
        heading(writer, &format!("NOT EVALUATED ({})", stats.issues.len()))?;
        for issue in &stats.issues {
            writeln!(writer, "  {issue}")?;
        }
    }

    if !missing.is_empty() {
        heading(writer, &format!("MISSING ENTRIES ({})", missing.len()))?;
        for entry in missing.iter().take(MAX_MISSING_SHOWN) {
            writeln!(writer, "  {}  {}", entry.date, entry.suggested.as_str())?;
        }
        if missing.len() > MAX_MISSING_SHOWN {
            writeln!(writer, "  ... and {} more", missing.len() - MAX_MISSING_SHOWN)?;
        }
    }

    Ok(())
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
pub struct JsonStats<'a> {
    pub statistics: &'a PeriodStatistics,
    pub missing_entries: &'a [MissingEntry],
}

pub fn format_stats_json(stats: &PeriodStatistics, missing: &[MissingEntry]) -> Result<String> {
    let report = JsonStats {
        statistics: stats,
        missing_entries: missing,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the stats command against `today`'s date for the default period.
pub fn run_at<W: Write>(
    writer: &mut W,
    args: &StatsArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<PeriodStatistics> {
    let entries = util::load_entries(&args.file)?;
    let range = resolve_range(args, &entries, today).context("invalid period")?;
    tracing::debug!(
        entries = entries.len(),
        start = %range.start(),
        end = %range.end(),
        "computing statistics"
    );

    let stats = aggregate(&entries, &config.compliance, range);
    for issue in &stats.issues {
        tracing::warn!(date = %issue.date(), "{issue}");
    }

    let missing: Vec<MissingEntry> = unrecorded_days(
        &entries,
        range,
        &config.region,
        &|date: NaiveDate, region: &str| config.is_holiday(date, region),
    )
    .into_iter()
    .map(|(date, suggested)| MissingEntry { date, suggested })
    .collect();

    if args.json {
        writeln!(writer, "{}", format_stats_json(&stats, &missing)?)?;
    } else {
        write_report(writer, &stats, &missing)?;
    }

    Ok(stats)
}

/// Runs the stats command.
pub fn run<W: Write>(writer: &mut W, args: &StatsArgs, config: &Config) -> Result<PeriodStatistics> {
    run_at(writer, args, config, Local::now().date_naive())
}
