// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - schedule logic that needs no I/O.

pub mod availability;
pub mod text_export;

pub use availability::{conflicting_ids, has_conflict, next_available_time};
pub use text_export::render_week_text;
