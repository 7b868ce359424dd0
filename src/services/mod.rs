pub mod catalog;
pub mod favorites;
pub mod profile;
pub mod providers;
pub mod recommendations;
pub mod reviews;
pub mod watchlists;

pub use providers::{MetadataProvider, TmdbProvider};
