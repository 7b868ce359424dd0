use uuid::Uuid;

use crate::{
    db::{ReviewRepository, Store, UserRepository},
    error::{AppError, AppResult},
    models::{AuthoredReview, NewReview, Review, ReviewAuthor, ReviewUpdate},
};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 10;

fn validate_rating(rating: i16) -> AppResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Review not found".to_string())
}

/// Attaches the author's public details to a review
async fn with_author(store: &dyn Store, review: Review) -> AppResult<AuthoredReview> {
    let author = store
        .find_user(review.user)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Author {} of review missing", review.user)))?;

    Ok(AuthoredReview::new(review, ReviewAuthor::from(&author)))
}

/// Public reviews for a movie, newest first
pub async fn for_movie(store: &dyn Store, movie_id: i64) -> AppResult<Vec<AuthoredReview>> {
    store.list_movie_reviews(movie_id).await
}

/// The caller's own review of a movie, if any
pub async fn own(store: &dyn Store, user_id: Uuid, movie_id: i64) -> AppResult<Option<Review>> {
    store.find_user_review(user_id, movie_id).await
}

/// Creates a review; one per (user, movie)
pub async fn create(
    store: &dyn Store,
    user_id: Uuid,
    request: NewReview,
) -> AppResult<AuthoredReview> {
    validate_rating(request.rating)?;

    let duplicate = || AppError::Conflict("Review already exists for this movie".to_string());

    if store
        .find_user_review(user_id, request.movie_id)
        .await?
        .is_some()
    {
        return Err(duplicate());
    }

    let review = store
        .insert_review(user_id, &request)
        .await?
        .ok_or_else(duplicate)?;

    tracing::info!(
        user_id = %user_id,
        movie_id = review.movie_id,
        rating = review.rating,
        "Review created"
    );

    with_author(store, review).await
}

/// Updates rating and/or content of a review the caller owns
pub async fn update(
    store: &dyn Store,
    user_id: Uuid,
    review_id: Uuid,
    request: ReviewUpdate,
) -> AppResult<AuthoredReview> {
    if let Some(rating) = request.rating {
        validate_rating(rating)?;
    }

    let review = store
        .update_review(user_id, review_id, &request)
        .await?
        .ok_or_else(not_found)?;

    with_author(store, review).await
}

pub async fn delete(store: &dyn Store, user_id: Uuid, review_id: Uuid) -> AppResult<()> {
    if !store.delete_review(user_id, review_id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = %user_id, review_id = %review_id, "Review deleted");
    Ok(())
}
