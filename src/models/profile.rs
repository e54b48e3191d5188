//! User profile model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;

/// User profile stored in Firestore.
///
/// Stored at: `user_profiles/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Auth identity (also used as document ID)
    pub id: String,
    /// Lowercased, unique across profiles
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    /// A profile needs both a name and a username before the schedule is shown.
    pub fn is_complete(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.full_name) && filled(&self.username)
    }
}

/// 3-30 ASCII letters or digits.
pub fn is_valid_username(username: &str) -> bool {
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len())
        && username.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Case-fold a username for storage and lookups.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: Option<&str>, full_name: Option<&str>) -> UserProfile {
        UserProfile {
            id: "user-1".to_string(),
            username: username.map(String::from),
            full_name: full_name.map(String::from),
            avatar_url: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_profile_completeness() {
        assert!(profile(Some("alice"), Some("Alice A")).is_complete());
        assert!(!profile(None, Some("Alice A")).is_complete());
        assert!(!profile(Some("alice"), None).is_complete());
        assert!(!profile(Some("alice"), Some("   ")).is_complete());
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("Alice2026"));
        assert!(is_valid_username(&"a".repeat(30)));

        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(&"a".repeat(31)));
        assert!(!is_valid_username("alice_b"));
        assert!(!is_valid_username("alice.b"));
        assert!(!is_valid_username("ålice"));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  AliceB "), "aliceb");
    }
}
