//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Profiles keyed by auth identity
    pub const USER_PROFILES: &str = "user_profiles";
    /// Schedule entries keyed by entry id
    pub const SCHEDULE_ENTRIES: &str = "schedule_entries";
}
