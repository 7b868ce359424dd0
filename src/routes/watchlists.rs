use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{
    extract::{AppJson, AppPath},
    AppState,
};
use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{NewWatchlist, Watchlist},
    services::watchlists,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub movie_id: i64,
}

pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Watchlist>>> {
    Ok(Json(watchlists::list(state.store.as_ref(), user.user_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<NewWatchlist>,
) -> AppResult<(StatusCode, Json<Watchlist>)> {
    let watchlist = watchlists::create(state.store.as_ref(), user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(watchlist)))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(watchlist_id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    watchlists::delete(state.store.as_ref(), user.user_id, watchlist_id).await?;
    Ok(Json(json!({ "message": "Watchlist deleted" })))
}

pub async fn add_movie(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(watchlist_id): AppPath<Uuid>,
    AppJson(request): AppJson<AddMovieRequest>,
) -> AppResult<Json<Watchlist>> {
    let watchlist =
        watchlists::add_movie(state.store.as_ref(), user.user_id, watchlist_id, request.movie_id)
            .await?;
    Ok(Json(watchlist))
}

pub async fn remove_movie(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((watchlist_id, movie_id)): AppPath<(Uuid, i64)>,
) -> AppResult<Json<Watchlist>> {
    let watchlist =
        watchlists::remove_movie(state.store.as_ref(), user.user_id, watchlist_id, movie_id)
            .await?;
    Ok(Json(watchlist))
}
