use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{FavoriteRepository, ReviewRepository, UserRepository, WatchlistRepository};
use crate::{
    error::AppResult,
    models::{
        AuthoredReview, Favorite, NewReview, NewWatchlist, ProfileUpdate, Review, ReviewAuthor,
        ReviewUpdate, User, Watchlist, WatchlistEntry,
    },
};

/// Process-local store used for tests and `STORAGE_BACKEND=memory`
///
/// Rows are kept in insertion order, which is the storage order the
/// recommendation logic relies on.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: HashMap<Uuid, User>,
    favorites: Vec<Favorite>,
    watchlists: Vec<Watchlist>,
    reviews: Vec<Review>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user record
    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&user_id).cloned())
    }

    async fn update_user(&self, user_id: Uuid, update: &ProfileUpdate) -> AppResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(None);
        };

        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(avatar_url) = &update.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        if let Some(preferences) = &update.preferences {
            user.preferences = preferences.clone();
        }

        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn list_favorites(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|f| f.user == user_id)
            .cloned()
            .collect())
    }

    async fn find_favorite(&self, user_id: Uuid, movie_id: i64) -> AppResult<Option<Favorite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .find(|f| f.user == user_id && f.movie_id == movie_id)
            .cloned())
    }

    async fn insert_favorite(&self, user_id: Uuid, movie_id: i64) -> AppResult<Option<Favorite>> {
        let mut inner = self.inner.write().await;
        if inner
            .favorites
            .iter()
            .any(|f| f.user == user_id && f.movie_id == movie_id)
        {
            return Ok(None);
        }

        let favorite = Favorite {
            id: Uuid::new_v4(),
            user: user_id,
            movie_id,
            created_at: Utc::now(),
        };
        inner.favorites.push(favorite.clone());
        Ok(Some(favorite))
    }

    async fn delete_favorite(&self, user_id: Uuid, movie_id: i64) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.favorites.len();
        inner
            .favorites
            .retain(|f| !(f.user == user_id && f.movie_id == movie_id));
        Ok(inner.favorites.len() < before)
    }
}

#[async_trait]
impl WatchlistRepository for MemoryStore {
    async fn list_watchlists(&self, user_id: Uuid) -> AppResult<Vec<Watchlist>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watchlists
            .iter()
            .rev()
            .filter(|w| w.user == user_id)
            .cloned()
            .collect())
    }

    async fn find_watchlist(
        &self,
        user_id: Uuid,
        watchlist_id: Uuid,
    ) -> AppResult<Option<Watchlist>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watchlists
            .iter()
            .find(|w| w.id == watchlist_id && w.user == user_id)
            .cloned())
    }

    async fn insert_watchlist(
        &self,
        user_id: Uuid,
        watchlist: &NewWatchlist,
    ) -> AppResult<Watchlist> {
        let now = Utc::now();
        let watchlist = Watchlist {
            id: Uuid::new_v4(),
            user: user_id,
            name: watchlist.name.clone(),
            description: watchlist.description.clone(),
            movies: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.watchlists.push(watchlist.clone());
        Ok(watchlist)
    }

    async fn delete_watchlist(&self, user_id: Uuid, watchlist_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.watchlists.len();
        inner
            .watchlists
            .retain(|w| !(w.id == watchlist_id && w.user == user_id));
        Ok(inner.watchlists.len() < before)
    }

    async fn insert_watchlist_entry(&self, watchlist_id: Uuid, movie_id: i64) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(watchlist) = inner.watchlists.iter_mut().find(|w| w.id == watchlist_id) else {
            return Ok(false);
        };
        if watchlist.contains(movie_id) {
            return Ok(false);
        }

        let now = Utc::now();
        watchlist.movies.push(WatchlistEntry {
            movie_id,
            added_at: now,
        });
        watchlist.updated_at = now;
        Ok(true)
    }

    async fn delete_watchlist_entry(&self, watchlist_id: Uuid, movie_id: i64) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(watchlist) = inner.watchlists.iter_mut().find(|w| w.id == watchlist_id) else {
            return Ok(false);
        };

        let before = watchlist.movies.len();
        watchlist.movies.retain(|entry| entry.movie_id != movie_id);
        if watchlist.movies.len() == before {
            return Ok(false);
        }
        watchlist.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn list_movie_reviews(&self, movie_id: i64) -> AppResult<Vec<AuthoredReview>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .iter()
            .rev()
            .filter(|r| r.movie_id == movie_id)
            .filter_map(|r| {
                inner
                    .users
                    .get(&r.user)
                    .map(|u| AuthoredReview::new(r.clone(), ReviewAuthor::from(u)))
            })
            .collect())
    }

    async fn find_user_review(&self, user_id: Uuid, movie_id: i64) -> AppResult<Option<Review>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .iter()
            .find(|r| r.user == user_id && r.movie_id == movie_id)
            .cloned())
    }

    async fn top_user_reviews(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        let mut reviews: Vec<Review> = inner
            .reviews
            .iter()
            .filter(|r| r.user == user_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.rating.cmp(&a.rating));
        reviews.truncate(limit);
        Ok(reviews)
    }

    async fn insert_review(&self, user_id: Uuid, review: &NewReview) -> AppResult<Option<Review>> {
        let mut inner = self.inner.write().await;
        if inner
            .reviews
            .iter()
            .any(|r| r.user == user_id && r.movie_id == review.movie_id)
        {
            return Ok(None);
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            user: user_id,
            movie_id: review.movie_id,
            rating: review.rating,
            content: review.content.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.reviews.push(review.clone());
        Ok(Some(review))
    }

    async fn update_review(
        &self,
        user_id: Uuid,
        review_id: Uuid,
        update: &ReviewUpdate,
    ) -> AppResult<Option<Review>> {
        let mut inner = self.inner.write().await;
        let Some(review) = inner
            .reviews
            .iter_mut()
            .find(|r| r.id == review_id && r.user == user_id)
        else {
            return Ok(None);
        };

        if let Some(rating) = update.rating {
            review.rating = rating;
        }
        if let Some(content) = &update.content {
            review.content = content.clone();
        }
        review.updated_at = Utc::now();
        Ok(Some(review.clone()))
    }

    async fn delete_review(&self, user_id: Uuid, review_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.reviews.len();
        inner
            .reviews
            .retain(|r| !(r.id == review_id && r.user == user_id));
        Ok(inner.reviews.len() < before)
    }
}
