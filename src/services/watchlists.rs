use uuid::Uuid;

use crate::{
    db::{Store, WatchlistRepository},
    error::{AppError, AppResult},
    models::{NewWatchlist, Watchlist},
};

fn not_found() -> AppError {
    AppError::NotFound("Watchlist not found".to_string())
}

/// Loads a watchlist the caller owns; someone else's list is reported as missing
async fn owned(store: &dyn Store, user_id: Uuid, watchlist_id: Uuid) -> AppResult<Watchlist> {
    store
        .find_watchlist(user_id, watchlist_id)
        .await?
        .ok_or_else(not_found)
}

pub async fn list(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Watchlist>> {
    store.list_watchlists(user_id).await
}

pub async fn create(store: &dyn Store, user_id: Uuid, request: NewWatchlist) -> AppResult<Watchlist> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput(
            "Watchlist name is required".to_string(),
        ));
    }

    let request = NewWatchlist {
        name: name.to_string(),
        description: request.description,
    };
    let watchlist = store.insert_watchlist(user_id, &request).await?;

    tracing::info!(user_id = %user_id, watchlist_id = %watchlist.id, "Watchlist created");
    Ok(watchlist)
}

pub async fn delete(store: &dyn Store, user_id: Uuid, watchlist_id: Uuid) -> AppResult<()> {
    if !store.delete_watchlist(user_id, watchlist_id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = %user_id, watchlist_id = %watchlist_id, "Watchlist deleted");
    Ok(())
}

/// Appends a movie, rejecting one that is already in the list
pub async fn add_movie(
    store: &dyn Store,
    user_id: Uuid,
    watchlist_id: Uuid,
    movie_id: i64,
) -> AppResult<Watchlist> {
    let watchlist = owned(store, user_id, watchlist_id).await?;
    if watchlist.contains(movie_id) || !store.insert_watchlist_entry(watchlist.id, movie_id).await? {
        return Err(AppError::Conflict("Movie already in watchlist".to_string()));
    }

    owned(store, user_id, watchlist_id).await
}

/// Removes a movie; removing one that is not there returns the list unchanged
pub async fn remove_movie(
    store: &dyn Store,
    user_id: Uuid,
    watchlist_id: Uuid,
    movie_id: i64,
) -> AppResult<Watchlist> {
    let watchlist = owned(store, user_id, watchlist_id).await?;
    if !watchlist.contains(movie_id) {
        return Ok(watchlist);
    }

    store.delete_watchlist_entry(watchlist.id, movie_id).await?;
    owned(store, user_id, watchlist_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn named(name: &str) -> NewWatchlist {
        NewWatchlist {
            name: name.to_string(),
            description: Some("for later".to_string()),
        }
    }

    fn movie_ids(watchlist: &Watchlist) -> Vec<i64> {
        watchlist.movies.iter().map(|m| m.movie_id).collect()
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = MemoryStore::new();
        let result = create(&store, Uuid::new_v4(), named("  ")).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_duplicate_movie_leaves_entries_unchanged() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let watchlist = create(&store, user, named("Heist")).await.unwrap();

        add_movie(&store, user, watchlist.id, 161).await.unwrap();
        let result = add_movie(&store, user, watchlist.id, 161).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let current = owned(&store, user, watchlist.id).await.unwrap();
        assert_eq!(movie_ids(&current), vec![161]);
    }

    #[tokio::test]
    async fn test_remove_absent_movie_is_noop() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let watchlist = create(&store, user, named("Heist")).await.unwrap();
        add_movie(&store, user, watchlist.id, 161).await.unwrap();

        let unchanged = remove_movie(&store, user, watchlist.id, 999).await.unwrap();
        assert_eq!(movie_ids(&unchanged), vec![161]);

        let emptied = remove_movie(&store, user, watchlist.id, 161).await.unwrap();
        assert!(emptied.movies.is_empty());
    }

    #[tokio::test]
    async fn test_other_users_watchlist_is_not_found() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let watchlist = create(&store, owner, named("Mine")).await.unwrap();

        assert!(matches!(
            add_movie(&store, intruder, watchlist.id, 1).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            delete(&store, intruder, watchlist.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(list(&store, owner).await.unwrap().len(), 1);
    }
}
