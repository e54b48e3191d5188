// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of a week for copy/paste sharing.
//!
//! Only public entries are listed; private ones are omitted entirely rather
//! than shown as busy.

use crate::models::entry::sort_by_start;
use crate::models::week::{day_label, DAY_NAMES};
use crate::models::{ScheduleEntry, WeekKey, WeekSchedule};
use std::fmt::Write as _;

const NO_PLANS: &str = "No public plans.";

/// Render the week as text, one block per day.
pub fn render_week_text(week: WeekKey, schedule: &WeekSchedule) -> String {
    let dates = week.dates();
    let mut text = String::new();

    // Writing into a String cannot fail, so the fmt::Result is ignored below.
    let _ = writeln!(
        text,
        "Weekly Schedule {} - {}\n",
        dates[0].format("%m/%d/%Y"),
        dates[6].format("%m/%d/%Y")
    );

    for (day_index, (date, name)) in dates.iter().zip(DAY_NAMES).enumerate() {
        let _ = writeln!(text, "{} {}", name, day_label(*date));

        let mut public: Vec<ScheduleEntry> = schedule
            .get(&(day_index as u8))
            .map(|entries| entries.iter().filter(|e| !e.is_private).cloned().collect())
            .unwrap_or_default();

        if public.is_empty() {
            let _ = writeln!(text, "{NO_PLANS}");
        } else {
            sort_by_start(&mut public);
            for entry in &public {
                let _ = writeln!(text, "{} {}", time_range(entry), entry.description);
            }
        }
        text.push('\n');
    }

    text
}

fn time_range(entry: &ScheduleEntry) -> String {
    if entry.end_time.is_empty() {
        entry.start_time.clone()
    } else {
        format!("{} - {}", entry.start_time, entry.end_time)
    }
}
