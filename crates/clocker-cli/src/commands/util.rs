//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use clocker_core::DayEntry;

/// Reads a JSON array of day entries. Every entry is validated on load.
pub fn load_entries(path: &Path) -> Result<Vec<DayEntry>> {
    let content = read_file(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid day entries in {}", path.display()))
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses `YYYY-MM` into a year and month number.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let Some((year, month)) = s.split_once('-') else {
        anyhow::bail!("Invalid month: {s}. Use YYYY-MM (e.g., 2025-03)");
    };
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in month '{s}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month number in '{s}'"))?;
    Ok((year, month))
}
