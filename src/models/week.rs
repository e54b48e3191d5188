// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week addressing.
//!
//! Every entry is partitioned by the Monday of its week, formatted
//! `MM/DD/YYYY`. Day indices run 0 (Monday) through 6 (Sunday).

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DAYS_PER_WEEK: u8 = 7;

pub const DAY_NAMES: [&str; DAYS_PER_WEEK as usize] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEK_KEY_FORMAT: &str = "%m/%d/%Y";

/// Canonical week identifier: the Monday of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    monday: NaiveDate,
}

impl WeekKey {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday();
        Self {
            monday: date - Duration::days(i64::from(offset)),
        }
    }

    /// The week containing today (UTC).
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Monday through Sunday of this week.
    pub fn dates(&self) -> [NaiveDate; DAYS_PER_WEEK as usize] {
        std::array::from_fn(|i| self.monday + Duration::days(i as i64))
    }

    pub fn previous(&self) -> Self {
        Self {
            monday: self.monday - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            monday: self.monday + Duration::days(7),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.monday.format(WEEK_KEY_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid week key '{0}': expected MM/DD/YYYY")]
pub struct WeekKeyError(pub String);

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    /// Parses any `MM/DD/YYYY` date and snaps it to the Monday of its week.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), WEEK_KEY_FORMAT)
            .map(Self::containing)
            .map_err(|_| WeekKeyError(s.to_string()))
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Short `M/D` label used in day headings.
pub fn day_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

pub fn is_valid_day_index(day_index: u8) -> bool {
    day_index < DAYS_PER_WEEK
}
