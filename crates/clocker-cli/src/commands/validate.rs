//! Validate command: checks each day entry of a file on its own.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clocker_core::DayEntry;
use serde_json::Value;

use super::util;

/// Counts from one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub valid: usize,
    pub invalid: usize,
}

pub fn run<W: Write>(writer: &mut W, path: &Path) -> Result<Summary> {
    let content = util::read_file(path)?;
    let raw: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    let mut summary = Summary {
        valid: 0,
        invalid: 0,
    };
    let mut seen: BTreeSet<NaiveDate> = BTreeSet::new();

    for (position, value) in raw.into_iter().enumerate() {
        let label = value
            .get("date")
            .and_then(Value::as_str)
            .map_or_else(|| format!("entry #{}", position + 1), String::from);

        match serde_json::from_value::<DayEntry>(value) {
            Ok(entry) if !seen.insert(entry.date()) => {
                summary.invalid += 1;
                writeln!(writer, "{label}  invalid: duplicate entry for this date")?;
            }
            Ok(entry) => {
                summary.valid += 1;
                writeln!(
                    writer,
                    "{label}  ok       {:<8}  {} segment(s)",
                    entry.entry_type().as_str(),
                    entry.segments().len()
                )?;
            }
            Err(err) => {
                summary.invalid += 1;
                writeln!(writer, "{label}  invalid: {err}")?;
            }
        }
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} valid, {} invalid",
        summary.valid, summary.invalid
    )?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn test_reports_each_entry() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("entries.json");
        std::fs::write(
            &path,
            r#"[
                {"date": "2025-03-03", "type": "work", "segments": [
                    {"kind": "work", "start": "08:00", "end": "12:00"},
                    {"kind": "work", "start": "12:30", "end": "16:30"}
                ]},
                {"date": "2025-03-04", "type": "work", "segments": [
                    {"kind": "work", "start": "08:00", "end": "12:00"},
                    {"kind": "work", "start": "11:00", "end": "13:00"}
                ]},
                {"date": "2025-03-05", "type": "vacation"},
                {"date": "2025-03-05", "type": "sick"},
                {"date": "2025-03-06", "type": "sick", "segments": [
                    {"kind": "work", "start": "08:00", "end": "09:00"}
                ]},
                {"type": "work"}
            ]"#,
        )
        .unwrap();

        let mut output = Vec::new();
        let summary = run(&mut output, &path).unwrap();

        assert_eq!(summary, Summary { valid: 2, invalid: 4 });
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        2025-03-03  ok       work      2 segment(s)
        2025-03-04  invalid: segments overlap: work 08:00-12:00 overlaps with work 11:00-13:00
        2025-03-05  ok       vacation  0 segment(s)
        2025-03-05  invalid: duplicate entry for this date
        2025-03-06  invalid: cannot record segments on a sick entry, only work entries accept segments
        entry #6  invalid: missing field `date`

        2 valid, 4 invalid
        ");
    }
}
