use uuid::Uuid;

use crate::{
    db::{FavoriteRepository, Store},
    error::{AppError, AppResult},
    models::Favorite,
};

/// The user's favorites, newest first
pub async fn list(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Favorite>> {
    let mut favorites = store.list_favorites(user_id).await?;
    favorites.reverse();
    Ok(favorites)
}

pub async fn is_favorite(store: &dyn Store, user_id: Uuid, movie_id: i64) -> AppResult<bool> {
    Ok(store.find_favorite(user_id, movie_id).await?.is_some())
}

/// Adds a favorite, rejecting a duplicate (user, movie) pair
pub async fn add(store: &dyn Store, user_id: Uuid, movie_id: i64) -> AppResult<Favorite> {
    if store.find_favorite(user_id, movie_id).await?.is_some() {
        return Err(already_favorite());
    }

    // The insert is conditional too, so a concurrent add still ends up here
    let favorite = store
        .insert_favorite(user_id, movie_id)
        .await?
        .ok_or_else(already_favorite)?;

    tracing::info!(user_id = %user_id, movie_id, "Favorite added");
    Ok(favorite)
}

pub async fn remove(store: &dyn Store, user_id: Uuid, movie_id: i64) -> AppResult<()> {
    if !store.delete_favorite(user_id, movie_id).await? {
        return Err(AppError::NotFound("Favorite not found".to_string()));
    }

    tracing::info!(user_id = %user_id, movie_id, "Favorite removed");
    Ok(())
}

fn already_favorite() -> AppError {
    AppError::Conflict("Movie already in favorites".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_add_twice_is_conflict_with_single_record() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        add(&store, user, 550).await.unwrap();
        let second = add(&store, user, 550).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(list(&store, user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for movie_id in [1, 2, 3] {
            add(&store, user, movie_id).await.unwrap();
        }

        let ids: Vec<i64> = list(&store, user)
            .await
            .unwrap()
            .iter()
            .map(|f| f.movie_id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_remove_and_check() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        add(&store, user, 42).await.unwrap();

        assert!(is_favorite(&store, user, 42).await.unwrap());
        assert!(!is_favorite(&store, Uuid::new_v4(), 42).await.unwrap());

        remove(&store, user, 42).await.unwrap();
        assert!(!is_favorite(&store, user, 42).await.unwrap());
        assert!(matches!(
            remove(&store, user, 42).await,
            Err(AppError::NotFound(_))
        ));
    }
}
