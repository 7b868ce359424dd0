//! Movie metadata provider abstraction
//!
//! The API never owns movie data. Everything about a movie beyond its id comes
//! from a metadata provider (TMDB in production), and proxy endpoints relay the
//! provider's JSON as-is.

use serde_json::Value;

use crate::{
    error::AppResult,
    models::{DiscoverQuery, Movie, TimeWindow},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
///
/// Proxy methods return the raw JSON body. `recommendations` is typed because
/// the recommendation aggregator inspects movie ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Filtered movie discovery
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Value>;

    /// Free-text title search
    async fn search(&self, query: &str, page: u32) -> AppResult<Value>;

    /// Trending movies for a day or week
    async fn trending(&self, window: TimeWindow) -> AppResult<Value>;

    /// Full details for one movie
    async fn movie_details(&self, movie_id: i64) -> AppResult<Value>;

    /// The provider's movie genre list
    async fn genres(&self) -> AppResult<Value>;

    /// Movies the provider recommends for viewers of `movie_id`
    async fn recommendations(&self, movie_id: i64) -> AppResult<Vec<Movie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
