mod favorite;
mod movie;
mod review;
mod user;
mod watchlist;

pub use favorite::Favorite;
pub use movie::{DiscoverQuery, Movie, MoviePage, Recommendations, TimeWindow};
pub use review::{AuthoredReview, NewReview, Review, ReviewAuthor, ReviewUpdate};
pub use user::{Preferences, ProfileUpdate, User};
pub use watchlist::{NewWatchlist, Watchlist, WatchlistEntry};
