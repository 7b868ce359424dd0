use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{
    extract::{AppJson, AppPath},
    AppState,
};
use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{AuthoredReview, NewReview, Review, ReviewUpdate},
    services::reviews,
};

/// Public listing for a movie; no token required
pub async fn for_movie(
    State(state): State<AppState>,
    AppPath(movie_id): AppPath<i64>,
) -> AppResult<Json<Vec<AuthoredReview>>> {
    Ok(Json(reviews::for_movie(state.store.as_ref(), movie_id).await?))
}

/// The caller's review of a movie, or `null`
pub async fn own(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(movie_id): AppPath<i64>,
) -> AppResult<Json<Option<Review>>> {
    Ok(Json(reviews::own(state.store.as_ref(), user.user_id, movie_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<NewReview>,
) -> AppResult<(StatusCode, Json<AuthoredReview>)> {
    let review = reviews::create(state.store.as_ref(), user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(review_id): AppPath<Uuid>,
    AppJson(request): AppJson<ReviewUpdate>,
) -> AppResult<Json<AuthoredReview>> {
    let review = reviews::update(state.store.as_ref(), user.user_id, review_id, request).await?;
    Ok(Json(review))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(review_id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    reviews::delete(state.store.as_ref(), user.user_id, review_id).await?;
    Ok(Json(json!({ "message": "Review deleted" })))
}
