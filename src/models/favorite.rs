use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie the user marked as favorite. Unique per (user, movie).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user: Uuid,
    pub movie_id: i64,
    pub created_at: DateTime<Utc>,
}
