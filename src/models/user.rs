use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Viewing preferences stored on a user profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Preferred genre ids, in the order the user chose them
    #[serde(default)]
    pub favorite_genres: Vec<i64>,
}

/// A registered user. Credentials are never serialized.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub preferences: Preferences,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub preferences: Option<Preferences>,
}
