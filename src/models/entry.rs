// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Schedule entry models for storage and API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::ClockTime;

/// Description shown to public viewers in place of a private entry's text.
pub const PRIVATE_PLACEHOLDER: &str = "Busy";

/// Entries of one week keyed by day index (0 = Monday).
pub type WeekSchedule = BTreeMap<u8, Vec<ScheduleEntry>>;

/// Schedule entry record stored in Firestore.
///
/// Stored at: `schedule_entries/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Entry ID (UUID v4, also used as document ID)
    pub id: String,
    /// Owner's auth identity
    pub user_id: String,
    /// Week partition key (`MM/DD/YYYY` of the Monday)
    pub week_key: String,
    /// 0 = Monday .. 6 = Sunday
    pub day_index: u8,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`, or None when open-ended
    pub end_time: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A time-blocked schedule item as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleEntry {
    pub id: String,
    pub start_time: String,
    /// Empty when the entry has no fixed end.
    pub end_time: String,
    pub description: String,
    pub is_private: bool,
}

impl ScheduleEntry {
    /// Parsed start time, if well-formed.
    pub fn start(&self) -> Option<ClockTime> {
        self.start_time.parse().ok()
    }

    /// Parsed end time. `Ok(None)` for open-ended entries.
    pub fn end(&self) -> Result<Option<ClockTime>, crate::time_utils::ClockTimeError> {
        if self.end_time.is_empty() {
            Ok(None)
        } else {
            self.end_time.parse().map(Some)
        }
    }

    /// The view exposed to public viewers. Private entries keep their times
    /// but their description becomes [`PRIVATE_PLACEHOLDER`].
    pub fn redacted(&self) -> Self {
        let mut entry = self.clone();
        if entry.is_private {
            entry.description = PRIVATE_PLACEHOLDER.to_string();
        }
        entry
    }
}

impl From<StoredEntry> for ScheduleEntry {
    fn from(stored: StoredEntry) -> Self {
        Self {
            id: stored.id,
            start_time: stored.start_time,
            end_time: stored.end_time.unwrap_or_default(),
            description: stored.description,
            is_private: stored.is_private,
        }
    }
}

/// Group stored entries by day, each day sorted by start time.
///
/// Days outside 0..=6 are dropped.
pub fn group_by_day<I>(entries: I) -> WeekSchedule
where
    I: IntoIterator<Item = StoredEntry>,
{
    let mut schedule = WeekSchedule::new();
    for stored in entries {
        if !crate::models::week::is_valid_day_index(stored.day_index) {
            tracing::warn!(
                entry_id = %stored.id,
                day_index = stored.day_index,
                "Skipping entry with out-of-range day index"
            );
            continue;
        }
        schedule
            .entry(stored.day_index)
            .or_default()
            .push(stored.into());
    }

    for day in schedule.values_mut() {
        sort_by_start(day);
    }
    schedule
}

/// Same as [`group_by_day`], with private descriptions redacted.
pub fn group_by_day_public<I>(entries: I) -> WeekSchedule
where
    I: IntoIterator<Item = StoredEntry>,
{
    let mut schedule = group_by_day(entries);
    for day in schedule.values_mut() {
        for entry in day.iter_mut() {
            *entry = entry.redacted();
        }
    }
    schedule
}

/// `HH:MM` strings order correctly as plain strings.
pub fn sort_by_start(entries: &mut [ScheduleEntry]) {
    entries.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}
