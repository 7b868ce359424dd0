use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A movie as returned by the metadata source
///
/// Only `id` is interpreted. Every other field is carried through untouched so
/// responses can be relayed to clients verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Movie {
    /// Creates a movie with no descriptive fields
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            details: Map::new(),
        }
    }
}

/// One page of movie results from a list endpoint (discover, recommendations)
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    pub results: Vec<Movie>,
}

/// Personalized recommendation payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendations {
    pub results: Vec<Movie>,
    pub total_results: usize,
}

impl Recommendations {
    pub fn new(results: Vec<Movie>) -> Self {
        let total_results = results.len();
        Self {
            results,
            total_results,
        }
    }
}

/// Window for the trending endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Filters for the discover endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub page: u32,
    /// Comma-separated genre ids
    pub with_genres: Option<String>,
    pub vote_average_gte: Option<f64>,
    pub vote_average_lte: Option<f64>,
    pub vote_count_gte: Option<u32>,
    pub year: Option<i32>,
    pub sort_by: Option<String>,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            page: 1,
            with_genres: None,
            vote_average_gte: None,
            vote_average_lte: None,
            vote_count_gte: None,
            year: None,
            sort_by: None,
        }
    }
}

impl DiscoverQuery {
    /// Best-rated movies in any of the given genres, ignoring titles with few votes
    pub fn top_rated_in_genres(genre_ids: &[i64], min_votes: u32) -> Self {
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            with_genres: Some(with_genres),
            sort_by: Some("vote_average.desc".to_string()),
            vote_count_gte: Some(min_votes),
            ..Self::default()
        }
    }

    /// Query parameters in the metadata source's naming
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];

        if let Some(genres) = self.with_genres.as_ref().filter(|g| !g.is_empty()) {
            params.push(("with_genres", genres.clone()));
        }
        if let Some(min) = self.vote_average_gte {
            params.push(("vote_average.gte", min.to_string()));
        }
        if let Some(max) = self.vote_average_lte {
            params.push(("vote_average.lte", max.to_string()));
        }
        if let Some(votes) = self.vote_count_gte {
            params.push(("vote_count.gte", votes.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_ref().filter(|s| !s.is_empty()) {
            params.push(("sort_by", sort_by.clone()));
        }

        params
    }
}
