use axum::{extract::State, Json};

use super::{extract::AppJson, AppState};
use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{ProfileUpdate, User},
    services::profile,
};

pub async fn get(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(profile::get(state.store.as_ref(), user.user_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<ProfileUpdate>,
) -> AppResult<Json<User>> {
    let user = profile::update(state.store.as_ref(), user.user_id, request).await?;
    Ok(Json(user))
}
