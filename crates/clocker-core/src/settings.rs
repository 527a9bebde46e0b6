//! Compliance thresholds supplied by configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed compliance settings. Reported at load time, before evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("max_daily_minutes must be greater than zero")]
    ZeroMaxDaily,

    #[error("standard_workday_minutes must be greater than zero")]
    ZeroStandardDay,

    /// Break rules must be listed with strictly increasing thresholds.
    #[error("break rules must be sorted by threshold: {previous} is followed by {next}")]
    UnsortedBreakRules { previous: u32, next: u32 },

    /// A longer working day cannot require a shorter break.
    #[error(
        "break rule at {threshold} minutes requires {required}m, less than the {previous_required}m of a lower threshold"
    )]
    DecreasingBreakRequirement {
        threshold: u32,
        required: u32,
        previous_required: u32,
    },
}

/// Break required once a day's work reaches `threshold_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRule {
    pub threshold_minutes: u32,
    pub required_break_minutes: u32,
}

impl BreakRule {
    pub const fn new(threshold_minutes: u32, required_break_minutes: u32) -> Self {
        Self {
            threshold_minutes,
            required_break_minutes,
        }
    }
}

/// Which earlier day a work day's rest period is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestPolicy {
    /// Only the immediately preceding calendar day. A non-work or missing day
    /// in between ends the chain.
    #[default]
    Calendar,
    /// The nearest earlier work day, however far back.
    SkipNonWork,
}

impl RestPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::SkipNonWork => "skip_non_work",
        }
    }
}

/// Thresholds for one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceSettings {
    /// Work beyond this is a violation. Default: 600 (10 hours).
    pub max_daily_minutes: u32,

    /// Default: 30 minutes from 6 hours, 45 minutes from 9 hours.
    pub break_rules: Vec<BreakRule>,

    /// Default: 660 (11 hours).
    pub min_rest_minutes_between_days: u32,

    /// Baseline for flextime. Default: 480 (8 hours).
    pub standard_workday_minutes: u32,

    pub rest_policy: RestPolicy,

    /// When set, a flextime day debits one standard day from the balance.
    pub flextime_day_debit: bool,
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self {
            max_daily_minutes: 600,
            break_rules: vec![BreakRule::new(360, 30), BreakRule::new(540, 45)],
            min_rest_minutes_between_days: 660,
            standard_workday_minutes: 480,
            rest_policy: RestPolicy::Calendar,
            flextime_day_debit: false,
        }
    }
}

impl ComplianceSettings {
    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_daily_minutes == 0 {
            return Err(ConfigurationError::ZeroMaxDaily);
        }
        if self.standard_workday_minutes == 0 {
            return Err(ConfigurationError::ZeroStandardDay);
        }
        for pair in self.break_rules.windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            if next.threshold_minutes <= previous.threshold_minutes {
                return Err(ConfigurationError::UnsortedBreakRules {
                    previous: previous.threshold_minutes,
                    next: next.threshold_minutes,
                });
            }
            if next.required_break_minutes < previous.required_break_minutes {
                return Err(ConfigurationError::DecreasingBreakRequirement {
                    threshold: next.threshold_minutes,
                    required: next.required_break_minutes,
                    previous_required: previous.required_break_minutes,
                });
            }
        }
        Ok(())
    }

    /// The rule with the highest threshold not exceeding `work_minutes`.
    pub fn break_rule_for(&self, work_minutes: u32) -> Option<&BreakRule> {
        self.break_rules
            .iter()
            .filter(|rule| rule.threshold_minutes <= work_minutes)
            .max_by_key(|rule| rule.threshold_minutes)
    }
}
