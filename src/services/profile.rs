use uuid::Uuid;

use crate::{
    db::{Store, UserRepository},
    error::{AppError, AppResult},
    models::{ProfileUpdate, User},
};

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

pub async fn get(store: &dyn Store, user_id: Uuid) -> AppResult<User> {
    store.find_user(user_id).await?.ok_or_else(not_found)
}

/// Applies a partial profile update
pub async fn update(store: &dyn Store, user_id: Uuid, mut request: ProfileUpdate) -> AppResult<User> {
    if let Some(username) = request.username.as_mut() {
        *username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
    }

    let user = store
        .update_user(user_id, &request)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        user_id = %user_id,
        favorite_genres = user.preferences.favorite_genres.len(),
        "Profile updated"
    );
    Ok(user)
}
