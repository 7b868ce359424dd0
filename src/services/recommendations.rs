use std::{collections::HashSet, future::Future, sync::Arc, time::Duration};

use uuid::Uuid;

use crate::{
    db::{FavoriteRepository, ReviewRepository, Store, UserRepository},
    error::{AppError, AppResult},
    models::{DiscoverQuery, Favorite, Movie, MoviePage, Recommendations, Review},
    services::providers::MetadataProvider,
};

/// Favorites that get a per-movie recommendation lookup
pub const SIMILAR_LOOKUP_FAVORITES: usize = 3;
/// Results kept from each per-favorite lookup
pub const SIMILAR_PER_FAVORITE: usize = 5;
/// Results kept from the genre discovery query
pub const GENRE_DISCOVERY_RESULTS: usize = 10;
/// Minimum vote count for genre discovery results
pub const GENRE_MIN_VOTES: u32 = 100;
/// Upper bound on the recommendation list
pub const MAX_RECOMMENDATIONS: usize = 20;

const TOP_REVIEWS: usize = 5;

/// What the aggregator knows about a user
#[derive(Debug, Clone)]
pub struct ProfileSignals {
    pub favorite_genres: Vec<i64>,
    /// All favorites in storage order
    pub favorites: Vec<Favorite>,
    pub top_reviews: Vec<Review>,
}

impl ProfileSignals {
    pub fn favorite_ids(&self) -> HashSet<i64> {
        self.favorites.iter().map(|f| f.movie_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.favorite_genres.is_empty()
    }
}

/// Loads the user's stored preferences, favorites and best reviews
///
/// This is the only step whose failure fails the request. A token for a user
/// that no longer exists counts as a failure.
pub async fn load_profile(store: &dyn Store, user_id: Uuid) -> AppResult<ProfileSignals> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("User {} could not be loaded", user_id)))?;

    let favorites = store.list_favorites(user_id).await?;
    let top_reviews = store.top_user_reviews(user_id, TOP_REVIEWS).await?;

    Ok(ProfileSignals {
        favorite_genres: user.preferences.favorite_genres,
        favorites,
        top_reviews,
    })
}

/// Runs `call` with a deadline, turning an elapsed deadline into an error
async fn with_timeout<T>(
    call_timeout: Duration,
    call: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::time::timeout(call_timeout, call)
        .await
        .map_err(|_| AppError::ExternalApi(format!("Timed out after {:?}", call_timeout)))?
}

/// Fetches recommendations for the first few favorites concurrently
///
/// Lists come back in favorite order regardless of completion order. A failed
/// or timed-out lookup yields an empty list.
async fn similar_candidates(
    provider: &Arc<dyn MetadataProvider>,
    favorites: &[Favorite],
    call_timeout: Duration,
) -> Vec<Vec<Movie>> {
    let tasks: Vec<_> = favorites
        .iter()
        .take(SIMILAR_LOOKUP_FAVORITES)
        .map(|favorite| {
            let provider = Arc::clone(provider);
            let movie_id = favorite.movie_id;
            let task = tokio::spawn(async move {
                with_timeout(call_timeout, provider.recommendations(movie_id)).await
            });
            (movie_id, task)
        })
        .collect();

    let mut lists = Vec::with_capacity(tasks.len());
    for (movie_id, task) in tasks {
        match task.await {
            Ok(Ok(mut movies)) => {
                movies.truncate(SIMILAR_PER_FAVORITE);
                lists.push(movies);
            }
            Ok(Err(e)) => {
                tracing::warn!(movie_id, error = %e, "Skipping recommendations for favorite");
                lists.push(Vec::new());
            }
            Err(e) => {
                tracing::error!(movie_id, error = %e, "Recommendation task failed");
                lists.push(Vec::new());
            }
        }
    }

    lists
}

/// Best-rated movies in the user's preferred genres, or nothing on failure
async fn genre_candidates(
    provider: &dyn MetadataProvider,
    genre_ids: &[i64],
    call_timeout: Duration,
) -> Vec<Movie> {
    let query = DiscoverQuery::top_rated_in_genres(genre_ids, GENRE_MIN_VOTES);

    let page = with_timeout(call_timeout, provider.discover(&query))
        .await
        .and_then(|body| {
            serde_json::from_value::<MoviePage>(body).map_err(|e| {
                AppError::ExternalApi(format!("Malformed discover response: {}", e))
            })
        });

    match page {
        Ok(page) => page
            .results
            .into_iter()
            .take(GENRE_DISCOVERY_RESULTS)
            .collect(),
        Err(e) => {
            tracing::warn!(genres = ?genre_ids, error = %e, "Skipping genre-based candidates");
            Vec::new()
        }
    }
}

/// Dedups candidates by id (first occurrence wins), drops favorites and caps the list
pub fn aggregate(
    candidates: impl IntoIterator<Item = Movie>,
    favorite_ids: &HashSet<i64>,
) -> Vec<Movie> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .filter(|movie| !favorite_ids.contains(&movie.id))
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

/// Builds personalized recommendations for a user
///
/// Candidate sources are best effort: any outbound failure just contributes
/// no candidates. Nothing is cached between calls.
pub async fn personalized(
    store: &dyn Store,
    provider: Arc<dyn MetadataProvider>,
    user_id: Uuid,
    call_timeout: Duration,
) -> AppResult<Recommendations> {
    let profile = load_profile(store, user_id).await?;

    tracing::debug!(
        user_id = %user_id,
        favorites = profile.favorites.len(),
        genres = profile.favorite_genres.len(),
        top_reviews = profile.top_reviews.len(),
        "Loaded recommendation profile"
    );

    if profile.is_empty() {
        return Ok(Recommendations::new(Vec::new()));
    }

    let mut candidates: Vec<Movie> = similar_candidates(&provider, &profile.favorites, call_timeout)
        .await
        .into_iter()
        .flatten()
        .collect();

    if !profile.favorite_genres.is_empty() {
        candidates.extend(
            genre_candidates(provider.as_ref(), &profile.favorite_genres, call_timeout).await,
        );
    }

    let candidate_count = candidates.len();
    let results = aggregate(candidates, &profile.favorite_ids());

    tracing::info!(
        user_id = %user_id,
        provider = provider.name(),
        candidates = candidate_count,
        results = results.len(),
        "Personalized recommendations assembled"
    );

    Ok(Recommendations::new(results))
}
