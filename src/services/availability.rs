// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conflict detection and free-slot suggestion for a single day.
//!
//! All comparisons happen in minutes since midnight. An entry without an end
//! time is "ongoing" when checking conflicts, but counts as one hour long when
//! looking for a free slot. Entries whose times do not parse are ignored.

use crate::models::ScheduleEntry;
use crate::time_utils::{format_minutes, ClockTime, MINUTES_PER_DAY, MINUTES_PER_HOUR};
use std::collections::HashSet;

/// Smallest gap between entries worth suggesting.
pub const MIN_SLOT_MINUTES: u16 = 15;

/// Suggested start when a day is empty or fully booked until midnight.
pub const DEFAULT_START: &str = "09:00";

/// Assumed length of an open-ended entry when looking for free time.
const OPEN_ENDED_MINUTES: u16 = MINUTES_PER_HOUR;

/// Parsed time range of an entry. `end` is None for open-ended entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: u16,
    pub end: Option<u16>,
}

impl TimeSpan {
    pub fn of(entry: &ScheduleEntry) -> Option<Self> {
        let start = entry.start()?;
        let end = entry.end().ok()?;
        Some(Self {
            start: start.minutes(),
            end: end.map(ClockTime::minutes),
        })
    }

    /// End used for slot suggestion: open-ended entries take one hour.
    pub fn effective_end(&self) -> u16 {
        self.end.unwrap_or(self.start + OPEN_ENDED_MINUTES)
    }

    /// Whether two spans collide.
    ///
    /// Same start always collides. Otherwise a start falling strictly inside
    /// the other's bounded range collides, as do overlapping half-open
    /// ranges when both are bounded. Touching ranges do not collide.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        if self.start == other.start {
            return true;
        }
        if let Some(other_end) = other.end {
            if self.start > other.start && self.start < other_end {
                return true;
            }
        }
        if let Some(end) = self.end {
            if other.start > self.start && other.start < end {
                return true;
            }
        }
        match (self.end, other.end) {
            (Some(end), Some(other_end)) => self.start < other_end && end > other.start,
            _ => false,
        }
    }
}

/// Whether `entry` collides with any other entry of the same day.
///
/// An entry never conflicts with itself (matched by id).
pub fn has_conflict(entry: &ScheduleEntry, day_entries: &[ScheduleEntry]) -> bool {
    let Some(span) = TimeSpan::of(entry) else {
        return false;
    };

    day_entries
        .iter()
        .filter(|other| other.id != entry.id)
        .filter_map(TimeSpan::of)
        .any(|other| span.overlaps(&other))
}

/// Ids of every entry in the day that collides with another.
pub fn conflicting_ids(day_entries: &[ScheduleEntry]) -> HashSet<String> {
    day_entries
        .iter()
        .filter(|entry| has_conflict(entry, day_entries))
        .map(|entry| entry.id.clone())
        .collect()
}

/// First start time with at least [`MIN_SLOT_MINUTES`] of free time after it.
///
/// Walks entries in start order and returns the end of the first entry that
/// is followed by a big enough gap. Falls back to the end of the last entry,
/// or [`DEFAULT_START`] when that would be midnight or later.
pub fn next_available_time(day_entries: &[ScheduleEntry]) -> String {
    let mut spans: Vec<TimeSpan> = day_entries.iter().filter_map(TimeSpan::of).collect();
    if spans.is_empty() {
        return DEFAULT_START.to_string();
    }
    spans.sort_by_key(|s| s.start);

    for pair in spans.windows(2) {
        let gap_start = pair[0].effective_end();
        let gap_end = pair[1].start;
        if gap_end >= gap_start && gap_end - gap_start >= MIN_SLOT_MINUTES {
            return format_minutes(gap_start);
        }
    }

    // spans is non-empty here
    let next = spans[spans.len() - 1].effective_end();
    if next >= MINUTES_PER_DAY {
        return DEFAULT_START.to_string();
    }
    format_minutes(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: id.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            description: String::new(),
            is_private: false,
        }
    }

    // ─── Conflicts ───────────────────────────────────────────────

    #[test]
    fn test_same_start_conflicts() {
        let a = entry("a", "09:00", "");
        let b = entry("b", "09:00", "09:30");
        assert!(has_conflict(&a, &[a.clone(), b.clone()]));
        assert!(has_conflict(&b, &[a, b.clone()]));
    }

    #[test]
    fn test_interior_overlap_conflicts() {
        let a = entry("a", "09:00", "10:00");
        let b = entry("b", "09:30", "10:30");
        let day = [a.clone(), b.clone()];
        assert!(has_conflict(&a, &day));
        assert!(has_conflict(&b, &day));
    }

    #[test]
    fn test_adjacent_entries_do_not_conflict() {
        let a = entry("a", "09:00", "10:00");
        let b = entry("b", "10:00", "11:00");
        let day = [a.clone(), b.clone()];
        assert!(!has_conflict(&a, &day));
        assert!(!has_conflict(&b, &day));
    }

    #[test]
    fn test_open_ended_inside_bounded_conflicts() {
        let bounded = entry("a", "09:00", "11:00");
        let open = entry("b", "10:00", "");
        let day = [bounded.clone(), open.clone()];
        assert!(has_conflict(&open, &day));
        assert!(has_conflict(&bounded, &day));
    }

    #[test]
    fn test_open_ended_entries_with_different_starts() {
        // Neither has a bounded end, so only identical starts would collide.
        let a = entry("a", "09:00", "");
        let b = entry("b", "09:15", "");
        assert!(!has_conflict(&a, &[a.clone(), b.clone()]));
    }

    #[test]
    fn test_open_ended_before_bounded_does_not_conflict() {
        let open = entry("a", "08:00", "");
        let bounded = entry("b", "09:00", "10:00");
        assert!(!has_conflict(&open, &[open.clone(), bounded.clone()]));
    }

    #[test]
    fn test_containment_conflicts() {
        let outer = entry("a", "08:00", "12:00");
        let inner = entry("b", "09:00", "10:00");
        assert!(has_conflict(&outer, &[outer.clone(), inner.clone()]));
    }

    #[test]
    fn test_entry_never_conflicts_with_itself() {
        let a = entry("a", "09:00", "10:00");
        assert!(!has_conflict(&a, &[a.clone()]));
    }

    #[test]
    fn test_malformed_entries_are_ignored() {
        let good = entry("a", "09:00", "10:00");
        let bad = entry("b", "9am", "");
        let bad_end = entry("c", "09:30", "later");
        let day = [good.clone(), bad.clone(), bad_end.clone()];
        assert!(!has_conflict(&good, &day));
        assert!(!has_conflict(&bad, &day));
    }

    #[test]
    fn test_conflicting_ids() {
        let day = [
            entry("a", "09:00", "10:00"),
            entry("b", "09:30", "10:30"),
            entry("c", "13:00", "14:00"),
        ];
        let ids = conflicting_ids(&day);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
    }

    // ─── Next available time ─────────────────────────────────────

    #[test]
    fn test_empty_day_defaults_to_nine() {
        assert_eq!(next_available_time(&[]), "09:00");
    }

    #[test]
    fn test_first_gap_is_returned() {
        let day = [entry("a", "09:00", "10:00"), entry("b", "10:30", "11:00")];
        assert_eq!(next_available_time(&day), "10:00");
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let day = [entry("b", "10:30", "11:00"), entry("a", "09:00", "10:00")];
        assert_eq!(next_available_time(&day), "10:00");
    }

    #[test]
    fn test_small_gap_is_skipped() {
        // 10-minute gap is too small, so the slot after the last entry wins.
        let day = [entry("a", "09:00", "10:00"), entry("b", "10:10", "11:00")];
        assert_eq!(next_available_time(&day), "11:00");
    }

    #[test]
    fn test_exact_fifteen_minute_gap_qualifies() {
        let day = [entry("a", "09:00", "10:00"), entry("b", "10:15", "11:00")];
        assert_eq!(next_available_time(&day), "10:00");
    }

    #[test]
    fn test_open_ended_counts_as_one_hour() {
        let day = [entry("a", "09:00", "")];
        assert_eq!(next_available_time(&day), "10:00");

        // 09:00 open-ended runs to 10:00, leaving no gap before 10:05.
        let day = [entry("a", "09:00", ""), entry("b", "10:05", "11:00")];
        assert_eq!(next_available_time(&day), "11:00");
    }

    #[test]
    fn test_overlapping_entries_do_not_produce_negative_gap() {
        let day = [entry("a", "09:00", "12:00"), entry("b", "10:00", "10:30")];
        assert_eq!(next_available_time(&day), "10:30");
    }

    #[test]
    fn test_wraps_to_nine_past_midnight() {
        let day = [entry("a", "23:30", "")];
        assert_eq!(next_available_time(&day), "09:00");
    }

    #[test]
    fn test_ends_just_before_midnight() {
        let day = [entry("a", "22:00", "23:45")];
        assert_eq!(next_available_time(&day), "23:45");
    }

    #[test]
    fn test_only_malformed_entries_is_like_empty() {
        let day = [entry("a", "nonsense", "")];
        assert_eq!(next_available_time(&day), "09:00");
    }
}
