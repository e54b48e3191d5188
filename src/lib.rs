// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly Scheduler: personal weekly calendars with public sharing
//!
//! This crate provides the backend API for maintaining a weekly schedule of
//! time-blocked entries and publishing a redacted, read-only view of it
//! under each user's username.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
