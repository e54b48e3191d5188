// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.
//!
//! Entry times travel as `HH:MM` strings (24h clock) both on the wire and in
//! Firestore. [`ClockTime`] is the parsed form used for comparisons.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as an RFC3339 string, used for `created_at`/`updated_at`.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// A time of day with minute resolution, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build from minutes since midnight. Returns `None` past 23:59.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.0 / MINUTES_PER_HOUR,
            self.0 % MINUTES_PER_HOUR
        )
    }
}

/// Error for strings that are not a strict `HH:MM` 24h time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time '{0}': expected HH:MM (00:00-23:59)")]
pub struct ClockTimeError(pub String);

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    /// Accepts exactly two hour digits, a colon and two minute digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockTimeError(s.to_string());

        let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2
            || minutes.len() != 2
            || !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hours: u16 = hours.parse().map_err(|_| invalid())?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
        if hours >= 24 || minutes >= MINUTES_PER_HOUR {
            return Err(invalid());
        }

        Ok(Self(hours * MINUTES_PER_HOUR + minutes))
    }
}

/// Format an arbitrary minute count as `HH:MM` without range checks.
///
/// Used for effective end times, which may run past midnight.
pub fn format_minutes(minutes: u16) -> String {
    format!(
        "{:02}:{:02}",
        minutes / MINUTES_PER_HOUR,
        minutes % MINUTES_PER_HOUR
    )
}
