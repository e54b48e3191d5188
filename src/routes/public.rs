// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public, read-only schedule routes (no authentication).
//!
//! Private entries are redacted to "Busy" before they leave the service.

use crate::error::{AppError, Result};
use crate::models::entry::group_by_day_public;
use crate::models::profile::normalize_username;
use crate::models::{UserProfile, WeekKey, WeekSchedule};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/public-schedule", get(get_public_schedule))
        .route("/public/{username}", get(get_public_page))
}

// ─── Public Schedule API ─────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicScheduleQuery {
    username: Option<String>,
    week_key: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PublicScheduleResponse {
    pub schedule: WeekSchedule,
    pub username: String,
}

/// One user's week, grouped by day with private entries redacted.
async fn get_public_schedule(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PublicScheduleQuery>,
) -> Result<Json<PublicScheduleResponse>> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(username), Some(week_key)) = (non_empty(params.username), non_empty(params.week_key))
    else {
        return Err(AppError::BadRequest(
            "Username and weekKey are required".to_string(),
        ));
    };

    let week: WeekKey = week_key.parse()?;
    let profile = find_public_profile(&state, &username).await?;

    tracing::debug!(
        username = %username,
        week_key = %week,
        "Fetching public schedule"
    );

    let entries = state.db.get_week_entries(&profile.id, week).await?;

    Ok(Json(PublicScheduleResponse {
        schedule: group_by_day_public(entries),
        username,
    }))
}

// ─── Public Page ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicPageQuery {
    week_key: Option<String>,
}

/// Everything a public schedule page needs for one week.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PublicPageResponse {
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub week_key: WeekKey,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub previous_week_key: WeekKey,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub next_week_key: WeekKey,
    /// Monday through Sunday, `MM/DD/YYYY`
    pub week_dates: Vec<String>,
    pub schedule: WeekSchedule,
}

/// Public page for `/public/{username}`, also reached via user subdomains.
async fn get_public_page(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(params): Query<PublicPageQuery>,
) -> Result<Json<PublicPageResponse>> {
    if username.is_empty() || !username.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let week = match params.week_key.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse()?,
        _ => WeekKey::current(),
    };

    let profile = find_public_profile(&state, &username).await?;
    let entries = state.db.get_week_entries(&profile.id, week).await?;

    Ok(Json(PublicPageResponse {
        username: profile.username.unwrap_or(username),
        full_name: profile.full_name,
        avatar_url: profile.avatar_url,
        week_key: week,
        previous_week_key: week.previous(),
        next_week_key: week.next(),
        week_dates: week
            .dates()
            .iter()
            .map(|d| d.format("%m/%d/%Y").to_string())
            .collect(),
        schedule: group_by_day_public(entries),
    }))
}

/// Resolve a username (any case) to its profile, or 404.
async fn find_public_profile(state: &AppState, username: &str) -> Result<UserProfile> {
    let normalized = normalize_username(username);
    let not_found = || AppError::NotFound("User not found".to_string());

    if normalized.is_empty() {
        return Err(not_found());
    }

    state
        .db
        .find_profile_by_username(&normalized)
        .await?
        .ok_or_else(not_found)
}
