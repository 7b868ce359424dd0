use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoverQuery, TimeWindow},
    services::providers::MetadataProvider,
};

/// Filtered discovery, relayed verbatim
pub async fn discover(provider: &dyn MetadataProvider, query: &DiscoverQuery) -> AppResult<Value> {
    provider.discover(query).await
}

/// Title search; the query must contain something besides whitespace
pub async fn search(provider: &dyn MetadataProvider, query: &str, page: u32) -> AppResult<Value> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    provider.search(query, page).await
}

pub async fn trending(provider: &dyn MetadataProvider, window: TimeWindow) -> AppResult<Value> {
    provider.trending(window).await
}

pub async fn movie_details(provider: &dyn MetadataProvider, movie_id: i64) -> AppResult<Value> {
    provider.movie_details(movie_id).await
}

pub async fn genres(provider: &dyn MetadataProvider) -> AppResult<Value> {
    provider.genres().await
}
