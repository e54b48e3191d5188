// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::entry::group_by_day;
use crate::models::profile::{is_valid_username, normalize_username};
use crate::models::week::DAYS_PER_WEEK;
use crate::models::{ScheduleEntry, StoredEntry, UserProfile, WeekKey};
use crate::services::availability::{conflicting_ids, next_available_time};
use crate::services::text_export::render_week_text;
use crate::time_utils::{now_rfc3339, ClockTime};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(update_profile))
        .route("/api/username-availability", get(check_username))
        .route("/api/schedule", get(get_schedule))
        .route("/api/schedule/text", get(get_schedule_text))
        .route("/api/schedule/entries", post(create_entry))
        .route(
            "/api/schedule/entries/{id}",
            patch(update_entry).delete(delete_entry),
        )
}

// ─── Profile ─────────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub id: String,
    pub email: Option<String>,
    /// None until the user saves a profile for the first time
    pub profile: Option<UserProfile>,
    /// False until both name and username are set
    pub complete: bool,
    pub public_url: Option<String>,
}

/// Get the current user's profile and completion state.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state.db.get_profile(&user.user_id).await?;

    let complete = profile.as_ref().is_some_and(UserProfile::is_complete);
    let public_url = profile
        .as_ref()
        .and_then(|p| p.username.as_deref())
        .map(|username| format!("https://{}.{}", username, state.config.root_domain));

    Ok(Json(MeResponse {
        id: user.user_id,
        email: user.email,
        profile,
        complete,
        public_url,
    }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30), custom(function = "validate_username_chars"))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

fn validate_username_chars(username: &str) -> std::result::Result<(), ValidationError> {
    if username.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars")
            .with_message("Username may only contain letters and numbers".into()))
    }
}

/// Create the profile on first save, update it afterwards.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    request.validate()?;

    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let username = normalize_username(&request.username);
    if !state
        .db
        .is_username_available(&username, Some(&user.user_id))
        .await?
    {
        return Err(AppError::Conflict("Username is not available".to_string()));
    }

    let now = now_rfc3339();
    let existing = state.db.get_profile(&user.user_id).await?;
    let (created_at, previous_avatar) = match existing {
        Some(profile) => (profile.created_at, profile.avatar_url),
        None => (now.clone(), None),
    };

    let profile = UserProfile {
        id: user.user_id.clone(),
        username: Some(username),
        full_name: Some(full_name.to_string()),
        avatar_url: request.avatar_url.or(previous_avatar),
        created_at,
        updated_at: now,
    };
    state.db.upsert_profile(&profile).await?;

    tracing::info!(
        user_id = %user.user_id,
        username = ?profile.username,
        "Profile saved"
    );

    Ok(Json(profile))
}

#[derive(Deserialize)]
struct UsernameQuery {
    username: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: bool,
}

/// Check whether a username can be claimed by the current user.
///
/// Badly formatted names are reported as unavailable rather than rejected.
async fn check_username(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<UsernameQuery>,
) -> Result<Json<UsernameAvailability>> {
    let username = normalize_username(&params.username);

    let available = if is_valid_username(&username) {
        state
            .db
            .is_username_available(&username, Some(&user.user_id))
            .await?
    } else {
        false
    };

    Ok(Json(UsernameAvailability {
        username,
        available,
    }))
}

// ─── Week Schedule ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekQuery {
    week_key: Option<String>,
}

/// Missing or blank week keys mean the current week.
fn resolve_week(raw: Option<&str>) -> Result<WeekKey> {
    match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(raw.parse()?),
        _ => Ok(WeekKey::current()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: ScheduleEntry,
    pub has_conflict: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekScheduleResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub week_key: WeekKey,
    pub week_dates: Vec<String>,
    /// Every day 0..=6, sorted by start time
    pub days: BTreeMap<u8, Vec<EntryView>>,
    /// Suggested start for a new entry, per day
    pub next_available: BTreeMap<u8, String>,
}

/// Owner's view of a week: all entries, conflict flags and slot suggestions.
async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WeekQuery>,
) -> Result<Json<WeekScheduleResponse>> {
    let week = resolve_week(params.week_key.as_deref())?;

    tracing::debug!(user_id = %user.user_id, week_key = %week, "Fetching week schedule");

    let mut schedule = group_by_day(state.db.get_week_entries(&user.user_id, week).await?);

    let mut days = BTreeMap::new();
    let mut next_available = BTreeMap::new();
    for day_index in 0..DAYS_PER_WEEK {
        let entries = schedule.remove(&day_index).unwrap_or_default();
        let conflicts = conflicting_ids(&entries);

        next_available.insert(day_index, next_available_time(&entries));
        days.insert(
            day_index,
            entries
                .into_iter()
                .map(|entry| EntryView {
                    has_conflict: conflicts.contains(&entry.id),
                    entry,
                })
                .collect(),
        );
    }

    Ok(Json(WeekScheduleResponse {
        week_key: week,
        week_dates: week
            .dates()
            .iter()
            .map(|d| d.format("%m/%d/%Y").to_string())
            .collect(),
        days,
        next_available,
    }))
}

/// Plain-text export of the week's public entries.
async fn get_schedule_text(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WeekQuery>,
) -> Result<impl IntoResponse> {
    let week = resolve_week(params.week_key.as_deref())?;
    let schedule = group_by_day(state.db.get_week_entries(&user.user_id, week).await?);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_week_text(week, &schedule),
    ))
}

// ─── Entries ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub week_key: String,
    #[validate(range(max = 6))]
    pub day_index: u8,
    /// Defaults to the day's next available time
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub start_time: Option<String>,
    /// Empty string clears the end time
    pub end_time: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

/// Parse an entry's times, requiring the end (if any) after the start.
fn parse_time_range(start: &str, end: Option<&str>) -> Result<(ClockTime, Option<ClockTime>)> {
    let start: ClockTime = start.trim().parse()?;
    let end = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(raw) => Some(raw.parse::<ClockTime>()?),
        None => None,
    };

    if end.is_some_and(|end| end <= start) {
        return Err(AppError::BadRequest(
            "End time must be after start time".to_string(),
        ));
    }
    Ok((start, end))
}

/// The requested start, or the day's next available time when none was given.
fn start_or_next_available(requested: Option<&str>, day: &[ScheduleEntry]) -> String {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(start) => start.to_string(),
        None => next_available_time(day),
    }
}

/// Merge a partial edit into a stored entry.
///
/// Missing fields keep their stored values; an empty `endTime` clears the
/// end. The merged times are checked together, so the entry is left
/// untouched when they are invalid.
fn apply_entry_update(
    stored: &mut StoredEntry,
    request: UpdateEntryRequest,
    now: String,
) -> Result<()> {
    let start_time = request
        .start_time
        .unwrap_or_else(|| stored.start_time.clone());
    let end_time = request.end_time.or_else(|| stored.end_time.clone());
    let (start, end) = parse_time_range(&start_time, end_time.as_deref())?;

    stored.start_time = start.to_string();
    stored.end_time = end.map(|e| e.to_string());
    if let Some(description) = request.description {
        stored.description = description;
    }
    if let Some(is_private) = request.is_private {
        stored.is_private = is_private;
    }
    stored.updated_at = now;
    Ok(())
}

/// Load an entry owned by `user_id`. Other users' entries look missing.
async fn owned_entry(state: &AppState, user_id: &str, entry_id: &str) -> Result<StoredEntry> {
    match state.db.get_entry(entry_id).await? {
        Some(entry) if entry.user_id == user_id => Ok(entry),
        _ => Err(AppError::NotFound(format!("Entry {} not found", entry_id))),
    }
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<ScheduleEntry>)> {
    request.validate()?;
    let week: WeekKey = request.week_key.parse()?;

    let requested_start = request
        .start_time
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    // The day is only needed to pick a default start.
    let day: Vec<ScheduleEntry> = match requested_start {
        Some(_) => Vec::new(),
        None => state
            .db
            .get_day_entries(&user.user_id, week, request.day_index)
            .await?
            .into_iter()
            .map(ScheduleEntry::from)
            .collect(),
    };
    let start_time = start_or_next_available(requested_start, &day);
    let (start, end) = parse_time_range(&start_time, request.end_time.as_deref())?;

    let now = now_rfc3339();
    let stored = StoredEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        week_key: week.to_string(),
        day_index: request.day_index,
        start_time: start.to_string(),
        end_time: end.map(|e| e.to_string()),
        description: request.description.unwrap_or_default(),
        is_private: request.is_private.unwrap_or(false),
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.set_entry(&stored).await?;

    tracing::info!(
        user_id = %user.user_id,
        entry_id = %stored.id,
        week_key = %week,
        day_index = stored.day_index,
        "Entry created"
    );

    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// Apply a partial edit. Last write wins.
async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<ScheduleEntry>> {
    request.validate()?;
    let mut stored = owned_entry(&state, &user.user_id, &entry_id).await?;

    apply_entry_update(&mut stored, request, now_rfc3339())?;
    state.db.set_entry(&stored).await?;

    tracing::debug!(user_id = %user.user_id, entry_id = %entry_id, "Entry updated");

    Ok(Json(stored.into()))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode> {
    owned_entry(&state, &user.user_id, &entry_id).await?;
    state.db.delete_entry(&entry_id).await?;

    tracing::info!(user_id = %user.user_id, entry_id = %entry_id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_range() {
        let (start, end) = parse_time_range("09:00", Some("10:30")).unwrap();
        assert_eq!(start.to_string(), "09:00");
        assert_eq!(end.unwrap().to_string(), "10:30");

        let (_, open) = parse_time_range("09:00", Some("")).unwrap();
        assert!(open.is_none());
        let (_, open) = parse_time_range("09:00", None).unwrap();
        assert!(open.is_none());
    }

    #[test]
    fn test_parse_time_range_rejects_bad_input() {
        let err = parse_time_range("9am", None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = parse_time_range("10:00", Some("09:00")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = parse_time_range("10:00", Some("10:00")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_resolve_week() {
        // Bracket the calls so a week boundary in between can't fail the test.
        for raw in [None, Some("  ")] {
            let before = WeekKey::current();
            let resolved = resolve_week(raw).unwrap();
            let after = WeekKey::current();
            assert!(resolved == before || resolved == after);
        }
        assert_eq!(
            resolve_week(Some("10/22/2026")).unwrap().to_string(),
            "10/19/2026"
        );
        assert!(matches!(
            resolve_week(Some("yesterday")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_profile_request_validation() {
        let request = UpdateProfileRequest {
            username: "alice_b".to_string(),
            full_name: "Alice".to_string(),
            avatar_url: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            username: "AliceB".to_string(),
            full_name: "Alice".to_string(),
            avatar_url: Some("not a url".to_string()),
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            username: "AliceB".to_string(),
            full_name: "Alice".to_string(),
            avatar_url: Some("https://cdn.example.com/a.png".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_entry_request_validation() {
        let request = CreateEntryRequest {
            week_key: "10/19/2026".to_string(),
            day_index: 7,
            start_time: None,
            end_time: None,
            description: None,
            is_private: None,
        };
        assert!(request.validate().is_err());
    }

    fn stored_entry(start: &str, end: Option<&str>) -> StoredEntry {
        StoredEntry {
            id: "e1".to_string(),
            user_id: "user-1".to_string(),
            week_key: "10/19/2026".to_string(),
            day_index: 0,
            start_time: start.to_string(),
            end_time: end.map(str::to_string),
            description: "Standup".to_string(),
            is_private: false,
            created_at: "2026-10-19T08:00:00Z".to_string(),
            updated_at: "2026-10-19T08:00:00Z".to_string(),
        }
    }

    fn update(start: Option<&str>, end: Option<&str>) -> UpdateEntryRequest {
        UpdateEntryRequest {
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            description: None,
            is_private: None,
        }
    }

    const LATER: &str = "2026-10-20T08:00:00Z";

    #[test]
    fn test_update_empty_end_clears_end() {
        let mut entry = stored_entry("09:00", Some("10:00"));
        apply_entry_update(&mut entry, update(None, Some("")), LATER.to_string()).unwrap();

        assert_eq!(entry.start_time, "09:00");
        assert!(entry.end_time.is_none());
        assert_eq!(entry.updated_at, LATER);
    }

    #[test]
    fn test_update_missing_end_keeps_stored_end() {
        let mut entry = stored_entry("09:00", Some("10:00"));
        let request = UpdateEntryRequest {
            description: Some("Planning".to_string()),
            is_private: Some(true),
            ..update(Some("09:30"), None)
        };
        apply_entry_update(&mut entry, request, LATER.to_string()).unwrap();

        assert_eq!(entry.start_time, "09:30");
        assert_eq!(entry.end_time.as_deref(), Some("10:00"));
        assert_eq!(entry.description, "Planning");
        assert!(entry.is_private);
    }

    #[test]
    fn test_update_start_checked_against_stored_end() {
        let mut entry = stored_entry("09:00", Some("10:00"));
        let before = entry.clone();

        let err = apply_entry_update(&mut entry, update(Some("10:30"), None), LATER.to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        // Nothing is applied on a rejected edit.
        assert_eq!(entry.start_time, before.start_time);
        assert_eq!(entry.end_time, before.end_time);
        assert_eq!(entry.updated_at, before.updated_at);
    }

    #[test]
    fn test_update_start_past_cleared_end_is_allowed() {
        let mut entry = stored_entry("09:00", Some("10:00"));
        apply_entry_update(&mut entry, update(Some("10:30"), Some("")), LATER.to_string())
            .unwrap();

        assert_eq!(entry.start_time, "10:30");
        assert!(entry.end_time.is_none());
    }

    #[test]
    fn test_create_start_defaults_to_next_available() {
        let day = vec![
            ScheduleEntry::from(stored_entry("09:00", Some("10:00"))),
            ScheduleEntry {
                id: "e2".to_string(),
                ..ScheduleEntry::from(stored_entry("10:30", Some("11:00")))
            },
        ];

        assert_eq!(start_or_next_available(None, &day), "10:00");
        assert_eq!(start_or_next_available(Some("  "), &day), "10:00");
        assert_eq!(start_or_next_available(None, &[]), "09:00");
        assert_eq!(start_or_next_available(Some(" 14:15 "), &day), "14:15");
    }
}
