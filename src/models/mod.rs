// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod entry;
pub mod profile;
pub mod week;

pub use entry::{ScheduleEntry, StoredEntry, WeekSchedule};
pub use profile::UserProfile;
pub use week::WeekKey;
