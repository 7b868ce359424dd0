use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    extract::{AppJson, AppPath},
    AppState,
};
use crate::{error::AppResult, middleware::AuthUser, models::Favorite, services::favorites};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub movie_id: i64,
}

pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Favorite>>> {
    Ok(Json(favorites::list(state.store.as_ref(), user.user_id).await?))
}

pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<Favorite>)> {
    let favorite = favorites::add(state.store.as_ref(), user.user_id, request.movie_id).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(movie_id): AppPath<i64>,
) -> AppResult<Json<Value>> {
    favorites::remove(state.store.as_ref(), user.user_id, movie_id).await?;
    Ok(Json(json!({ "message": "Removed from favorites" })))
}

pub async fn check(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(movie_id): AppPath<i64>,
) -> AppResult<Json<Value>> {
    let is_favorite = favorites::is_favorite(state.store.as_ref(), user.user_id, movie_id).await?;
    Ok(Json(json!({ "isFavorite": is_favorite })))
}
