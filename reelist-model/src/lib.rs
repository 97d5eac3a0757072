//! Shared data models for the Reelist platform.
//!
//! This crate holds the types that cross crate boundaries: strongly typed
//! identifiers, the cached catalog record, watched/watchlist entries, user
//! profile data, and the validated rating newtype. It carries no database or
//! HTTP logic of its own.

pub mod error;
pub mod ids;
pub mod movie;
pub mod rating;
pub mod user;
pub mod watch;

pub use error::ModelError;
pub use ids::{MovieId, UserId, WatchedId, WatchlistId};
pub use movie::{CatalogEntry, GENRE_SLOTS, GenreSlots};
pub use rating::Rating;
pub use user::{FollowPeer, UserProfile};
pub use watch::{WatchState, WatchedEntry, WatchlistEntry};
