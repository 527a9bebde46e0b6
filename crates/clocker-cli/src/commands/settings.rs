//! Config command: shows the effective settings after all layers merged.

use std::io::Write;

use anyhow::Result;
use clocker_core::format_minutes;

use crate::Config;

fn duration(minutes: u32) -> String {
    format_minutes(i64::from(minutes))
}

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let rules = &config.compliance;
    let holidays: usize = config.holidays.values().map(Vec::len).sum();

    writeln!(writer, "{:<21}{}", "Region:", config.region)?;
    writeln!(writer, "{:<21}{}", "Max daily work:", duration(rules.max_daily_minutes))?;
    writeln!(
        writer,
        "{:<21}{}",
        "Min rest:",
        duration(rules.min_rest_minutes_between_days)
    )?;
    writeln!(
        writer,
        "{:<21}{}",
        "Standard workday:",
        duration(rules.standard_workday_minutes)
    )?;
    writeln!(writer, "{:<21}{}", "Rest policy:", rules.rest_policy.as_str())?;
    writeln!(
        writer,
        "{:<21}{}",
        "Flextime day debit:",
        if rules.flextime_day_debit { "yes" } else { "no" }
    )?;
    writeln!(writer, "{:<21}{holidays} date(s) configured", "Holidays:")?;

    writeln!(writer)?;
    writeln!(writer, "BREAK RULES")?;
    writeln!(writer, "───────────")?;
    if rules.break_rules.is_empty() {
        writeln!(writer, "  (none)")?;
    }
    for rule in &rules.break_rules {
        writeln!(
            writer,
            "  from {}: {}",
            duration(rule.threshold_minutes),
            duration(rule.required_break_minutes)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_shows_default_settings() {
        let mut config = Config::default();
        config.holidays.insert(
            "BW".to_string(),
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            ],
        );

        let mut output = Vec::new();
        run(&mut output, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Region:              BW
        Max daily work:      10h 0m
        Min rest:            11h 0m
        Standard workday:    8h 0m
        Rest policy:         calendar
        Flextime day debit:  no
        Holidays:            2 date(s) configured

        BREAK RULES
        ───────────
          from 6h 0m: 30m
          from 9h 0m: 45m
        ");
    }
}
