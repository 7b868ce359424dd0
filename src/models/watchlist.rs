use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie entry inside a watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub movie_id: i64,
    pub added_at: DateTime<Utc>,
}

/// A named, ordered list of movies owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub movies: Vec<WatchlistEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Watchlist {
    /// Checks whether a movie is already in the list
    pub fn contains(&self, movie_id: i64) -> bool {
        self.movies.iter().any(|entry| entry.movie_id == movie_id)
    }
}

/// Fields needed to create a watchlist
#[derive(Debug, Clone, Deserialize)]
pub struct NewWatchlist {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}
