//! Clock times and minute arithmetic.
//!
//! All values are naive local clock times within one calendar day. The only
//! place a time is allowed to pass midnight is [`span_minutes`], which assumes
//! an end before the start belongs to the following day.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors produced when parsing clock times or pause durations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockParseError {
    /// The input was not shaped like `HH:MM`.
    #[error("invalid clock time '{input}', expected HH:MM")]
    InvalidFormat { input: String },

    /// Hour or minute out of range.
    #[error("clock time out of range: {hour}:{minute:02}")]
    OutOfRange { hour: u32, minute: u32 },
}

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Creates a clock time after range validation.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(hour: u32, minute: u32) -> Result<Self, ClockParseError> {
        if hour > 23 || minute > 59 {
            return Err(ClockParseError::OutOfRange { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub const fn hour(self) -> u32 {
        self.hour as u32
    }

    pub const fn minute(self) -> u32 {
        self.minute as u32
    }

    /// Minutes elapsed since midnight, in `0..1440`.
    pub const fn minutes_since_midnight(self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Builds a clock time from minutes since midnight.
    ///
    /// Returns `None` for values outside a single day.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }
        Self::new(minutes / 60, minutes % 60).ok()
    }
}

impl From<NaiveTime> for ClockTime {
    /// Seconds and below are truncated.
    #[allow(clippy::cast_possible_truncation)]
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ClockParseError;

    /// Accepts `H:MM`, `HH:MM` and `HH:MM:SS` (seconds are dropped).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockParseError::InvalidFormat {
            input: s.to_string(),
        };

        let mut parts = s.trim().split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(invalid());
        };
        if let Some(seconds) = parts.next() {
            if seconds.len() != 2
                || !all_digits(seconds)
                || !seconds.parse::<u32>().is_ok_and(|sec| sec <= 59)
            {
                return Err(invalid());
            }
        }
        if parts.next().is_some() || hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        if !all_digits(hour) || !all_digits(minute) {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

/// `u32::from_str` takes a leading `+`, clock fields must not.
fn all_digits(field: &str) -> bool {
    field.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<String> for ClockTime {
    type Error = ClockParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// Raw minutes from `start` to `end`.
///
/// An `end` earlier than `start` is taken to be on the following day, so the
/// span crosses midnight exactly once. Equal times yield zero; a full 24 hour
/// span cannot be expressed.
pub const fn span_minutes(start: ClockTime, end: ClockTime) -> u32 {
    let start = start.minutes_since_midnight();
    let end = end.minutes_since_midnight();
    if end >= start {
        end - start
    } else {
        (MINUTES_PER_DAY - start) + end
    }
}

/// Parses a pause given as a clock-shaped duration (`H:MM`).
///
/// The value is a length of time, not a time of day. A bare integer is read
/// as a number of minutes.
pub fn parse_pause(input: &str) -> Result<u32, ClockParseError> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && all_digits(trimmed) {
        return trimmed
            .parse()
            .map_err(|_| ClockParseError::InvalidFormat {
                input: input.to_string(),
            });
    }
    trimmed
        .parse::<ClockTime>()
        .map(ClockTime::minutes_since_midnight)
}

/// Formats a signed number of minutes as `Xh Ym`, or `Ym` under one hour.
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let magnitude = minutes.unsigned_abs();
    let hours = magnitude / 60;
    let rest = magnitude % 60;
    if hours >= 1 {
        format!("{sign}{hours}h {rest}m")
    } else {
        format!("{sign}{rest}m")
    }
}

/// Serde helper accepting a pause either as minutes or as an `H:MM` string.
pub(crate) fn deserialize_pause<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPause {
        Minutes(u32),
        Text(String),
    }

    match RawPause::deserialize(deserializer)? {
        RawPause::Minutes(minutes) => Ok(minutes),
        RawPause::Text(text) => parse_pause(&text).map_err(serde::de::Error::custom),
    }
}
