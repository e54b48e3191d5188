// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (one document per auth identity)
//! - Schedule entries (one document per entry, queried by user + week)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{StoredEntry, UserProfile, WeekKey};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token; skip the credential lookup entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by auth identity. `None` for users who never saved one.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a profile.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USER_PROFILES)
            .document_id(&profile.id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find the profile holding a username.
    ///
    /// Usernames are stored lowercased, so callers pass the normalized form.
    pub async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, AppError> {
        let mut matches: Vec<UserProfile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USER_PROFILES)
            .filter(|q| q.for_all([q.field("username").eq(username)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// Whether `username` is free for `current_user_id` to take.
    ///
    /// A username already held by the same user counts as available.
    pub async fn is_username_available(
        &self,
        username: &str,
        current_user_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let holder = self.find_profile_by_username(username).await?;
        Ok(match holder {
            None => true,
            Some(profile) => current_user_id == Some(profile.id.as_str()),
        })
    }

    // ─── Schedule Entry Operations ───────────────────────────────

    /// All entries a user has in one week, ordered by start time.
    pub async fn get_week_entries(
        &self,
        user_id: &str,
        week: WeekKey,
    ) -> Result<Vec<StoredEntry>, AppError> {
        let week_key = week.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::SCHEDULE_ENTRIES)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("week_key").eq(week_key.as_str()),
                ])
            })
            .order_by([("start_time", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Entries of a single day.
    pub async fn get_day_entries(
        &self,
        user_id: &str,
        week: WeekKey,
        day_index: u8,
    ) -> Result<Vec<StoredEntry>, AppError> {
        let entries = self.get_week_entries(user_id, week).await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.day_index == day_index)
            .collect())
    }

    /// Get a single entry by ID.
    pub async fn get_entry(&self, entry_id: &str) -> Result<Option<StoredEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SCHEDULE_ENTRIES)
            .obj()
            .one(entry_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace an entry.
    pub async fn set_entry(&self, entry: &StoredEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SCHEDULE_ENTRIES)
            .document_id(&entry.id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an entry.
    pub async fn delete_entry(&self, entry_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SCHEDULE_ENTRIES)
            .document_id(entry_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
