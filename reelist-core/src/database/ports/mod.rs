//! Storage ports: `async_trait` interfaces the engine depends on, implemented
//! by the Postgres repositories and mocked in unit tests.

pub mod follows;
pub mod movies;
pub mod users;
pub mod watch;

pub use follows::FollowStore;
pub use movies::{CatalogUpsert, MovieHead, MovieStore};
pub use users::{DashboardSnapshot, MovieCard, ProfileUpdate, UserStore};
pub use watch::{
    NewWatchlistEntry, WatchMarkers, WatchStore, WatchedDetail, WatchedItem,
    WatchlistItem,
};
