use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// A user's rating and write-up of one movie. Unique per (user, movie).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user: Uuid,
    pub movie_id: i64,
    pub rating: i16,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public author details shown next to a review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for ReviewAuthor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// A review with its author expanded in place of the user id
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredReview {
    pub id: Uuid,
    pub user: ReviewAuthor,
    pub movie_id: i64,
    pub rating: i16,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthoredReview {
    pub fn new(review: Review, author: ReviewAuthor) -> Self {
        Self {
            id: review.id,
            user: author,
            movie_id: review.movie_id,
            rating: review.rating,
            content: review.content,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// Fields needed to create a review
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub movie_id: i64,
    pub rating: i16,
    #[serde(default)]
    pub content: String,
}

/// Partial review update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUpdate {
    pub rating: Option<i16>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authored_review_expands_user() {
        let now = Utc::now();
        let author = ReviewAuthor {
            id: Uuid::new_v4(),
            username: "trinity".to_string(),
            avatar_url: Some("https://img.example/t.png".to_string()),
        };
        let review = Review {
            id: Uuid::new_v4(),
            user: author.id,
            movie_id: 603,
            rating: 9,
            content: "Still holds up".to_string(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(AuthoredReview::new(review, author)).unwrap();
        assert_eq!(value["user"]["username"], "trinity");
        assert_eq!(value["movieId"], 603);
    }
}
