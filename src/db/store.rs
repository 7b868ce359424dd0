use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        AuthoredReview, Favorite, NewReview, NewWatchlist, ProfileUpdate, Review, ReviewUpdate,
        User, Watchlist,
    },
};

/// User profile persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Applies the provided fields; `None` when the user does not exist
    async fn update_user(&self, user_id: Uuid, update: &ProfileUpdate) -> AppResult<Option<User>>;
}

/// Favorite persistence, scoped by owner
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// All favorites of a user in storage (insertion) order
    async fn list_favorites(&self, user_id: Uuid) -> AppResult<Vec<Favorite>>;

    async fn find_favorite(&self, user_id: Uuid, movie_id: i64) -> AppResult<Option<Favorite>>;

    /// Inserts a favorite; `None` when (user, movie) already exists
    async fn insert_favorite(&self, user_id: Uuid, movie_id: i64) -> AppResult<Option<Favorite>>;

    /// Returns whether a row was deleted
    async fn delete_favorite(&self, user_id: Uuid, movie_id: i64) -> AppResult<bool>;
}

/// Watchlist persistence, scoped by owner
#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Watchlists of a user, newest first
    async fn list_watchlists(&self, user_id: Uuid) -> AppResult<Vec<Watchlist>>;

    /// `None` when absent or owned by someone else
    async fn find_watchlist(&self, user_id: Uuid, watchlist_id: Uuid)
        -> AppResult<Option<Watchlist>>;

    async fn insert_watchlist(&self, user_id: Uuid, watchlist: &NewWatchlist)
        -> AppResult<Watchlist>;

    async fn delete_watchlist(&self, user_id: Uuid, watchlist_id: Uuid) -> AppResult<bool>;

    /// Appends an entry; `false` when the movie is already in the list
    async fn insert_watchlist_entry(&self, watchlist_id: Uuid, movie_id: i64) -> AppResult<bool>;

    /// Removes an entry; `false` when the movie was not in the list
    async fn delete_watchlist_entry(&self, watchlist_id: Uuid, movie_id: i64) -> AppResult<bool>;
}

/// Review persistence
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Public reviews of a movie with authors, newest first
    async fn list_movie_reviews(&self, movie_id: i64) -> AppResult<Vec<AuthoredReview>>;

    async fn find_user_review(&self, user_id: Uuid, movie_id: i64) -> AppResult<Option<Review>>;

    /// Highest-rated reviews of a user
    async fn top_user_reviews(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Review>>;

    /// Inserts a review; `None` when (user, movie) already exists
    async fn insert_review(&self, user_id: Uuid, review: &NewReview) -> AppResult<Option<Review>>;

    /// `None` when absent or owned by someone else
    async fn update_review(
        &self,
        user_id: Uuid,
        review_id: Uuid,
        update: &ReviewUpdate,
    ) -> AppResult<Option<Review>>;

    async fn delete_review(&self, user_id: Uuid, review_id: Uuid) -> AppResult<bool>;
}

/// Everything the API persists
pub trait Store: UserRepository + FavoriteRepository + WatchlistRepository + ReviewRepository {}

impl<T> Store for T where
    T: UserRepository + FavoriteRepository + WatchlistRepository + ReviewRepository
{
}
