use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod extract;
pub mod favorites;
pub mod movies;
pub mod profile;
pub mod reviews;
mod state;
pub mod watchlists;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Metadata proxy
        .route("/movies/popular", get(movies::popular))
        .route("/movies/search", get(movies::search))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/genres/list", get(movies::genres))
        .route(
            "/movies/recommendations/personalized",
            get(movies::personalized),
        )
        .route("/movies/:id", get(movies::details))
        // Profile
        .route("/users/profile", get(profile::get).put(profile::update))
        // Favorites
        .route("/users/favorites", get(favorites::list).post(favorites::add))
        .route("/users/favorites/:movie_id", delete(favorites::remove))
        .route("/users/favorites/:movie_id/check", get(favorites::check))
        // Watchlists
        .route(
            "/users/watchlists",
            get(watchlists::list).post(watchlists::create),
        )
        .route("/users/watchlists/:id", delete(watchlists::delete))
        .route("/users/watchlists/:id/movies", post(watchlists::add_movie))
        .route(
            "/users/watchlists/:id/movies/:movie_id",
            delete(watchlists::remove_movie),
        )
        // Reviews
        .route("/users/reviews", post(reviews::create))
        .route("/users/reviews/movie/:movie_id", get(reviews::for_movie))
        .route("/users/reviews/user/:movie_id", get(reviews::own))
        .route(
            "/users/reviews/:id",
            put(reviews::update).delete(reviews::delete),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
