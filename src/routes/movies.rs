use std::{fmt::Display, str::FromStr};

use axum::{extract::State, Json};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::{
    extract::{AppPath, AppQuery},
    AppState,
};
use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{DiscoverQuery, Recommendations, TimeWindow},
    services::{catalog, recommendations},
};

fn default_page() -> u32 {
    1
}

/// Reads an optional query value, treating `key=` the same as a missing key
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Filters for the popular listing; blank values mean "any"
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_rating: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_rating: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort_by: Option<String>,
}

impl From<PopularQuery> for DiscoverQuery {
    fn from(query: PopularQuery) -> Self {
        DiscoverQuery {
            page: query.page.unwrap_or_else(default_page),
            with_genres: query.genre,
            vote_average_gte: query.min_rating,
            vote_average_lte: query.max_rating,
            vote_count_gte: None,
            year: query.year,
            sort_by: query.sort_by,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    #[serde(default)]
    pub time_window: TimeWindow,
}

/// Filtered discovery, relayed from the metadata source
pub async fn popular(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PopularQuery>,
) -> AppResult<Json<Value>> {
    let query = DiscoverQuery::from(query);
    Ok(Json(catalog::discover(state.metadata.as_ref(), &query).await?))
}

pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> AppResult<Json<Value>> {
    let results = catalog::search(state.metadata.as_ref(), &query.query, query.page).await?;
    Ok(Json(results))
}

pub async fn trending(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TrendingQuery>,
) -> AppResult<Json<Value>> {
    let results = catalog::trending(state.metadata.as_ref(), query.time_window).await?;
    Ok(Json(results))
}

pub async fn details(
    State(state): State<AppState>,
    AppPath(movie_id): AppPath<i64>,
) -> AppResult<Json<Value>> {
    let movie = catalog::movie_details(state.metadata.as_ref(), movie_id).await?;
    Ok(Json(movie))
}

pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Value>> {
    Ok(Json(catalog::genres(state.metadata.as_ref()).await?))
}

/// Recommendations built from the caller's favorites, genres and reviews
pub async fn personalized(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Recommendations>> {
    let recommendations = recommendations::personalized(
        state.store.as_ref(),
        state.metadata.clone(),
        user.user_id,
        state.outbound_timeout,
    )
    .await?;

    Ok(Json(recommendations))
}
