//! Watched/watchlist storage port.
//!
//! Methods that touch more than one row are transactional in the
//! implementation: they either commit every statement (row mutation plus
//! score delta) or none. The port exposes whole transitions rather than raw
//! row operations so callers cannot break atomicity.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use reelist_model::{MovieId, Rating, UserId, WatchedId, WatchlistId};

/// Payload for adding a movie to the watchlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWatchlistEntry {
    pub movie_id: MovieId,
    pub priority: bool,
    pub notes: Option<String>,
}

/// A watched row joined with its catalog record, as listed.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct WatchedItem {
    pub watched_id: WatchedId,
    pub rating: Rating,
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// A single watched row with its review text.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct WatchedDetail {
    pub watched_id: WatchedId,
    pub rating: Rating,
    pub review: Option<String>,
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// A watchlist row joined with its catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct WatchlistItem {
    pub watchlist_id: WatchlistId,
    pub priority: bool,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// The caller's membership markers for a batch of movie ids, used to
/// annotate search results in one round trip per table.
#[derive(Debug, Clone, Default)]
pub struct WatchMarkers {
    pub watched: HashMap<MovieId, WatchedId>,
    pub watchlisted: HashSet<MovieId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Create a watchlist row. A row already present for the pair is a
    /// `Conflict`; nothing is written.
    async fn add_watchlist_entry(
        &self,
        user_id: UserId,
        entry: NewWatchlistEntry,
    ) -> Result<WatchlistId>;

    /// Delete a watchlist row by movie. Missing row is `NotFound`.
    async fn remove_watchlist_entry(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<()>;

    /// Flip the priority flag on a watchlist row.
    async fn set_watchlist_priority(
        &self,
        user_id: UserId,
        watchlist_id: WatchlistId,
        priority: bool,
    ) -> Result<()>;

    async fn is_watchlisted(&self, user_id: UserId, movie_id: MovieId)
    -> Result<bool>;

    async fn list_watchlist(&self, user_id: UserId) -> Result<Vec<WatchlistItem>>;

    /// Transactional mark-watched: insert the watched row, defensively drop
    /// any watchlist row for the pair, and credit +1/+6 kernels. A watched
    /// row already present for the pair is a `Conflict`.
    async fn mark_watched(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: Rating,
        review: Option<String>,
    ) -> Result<WatchedId>;

    /// Transactional in-place update; kernels adjust by the review-presence
    /// transition.
    async fn update_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
        rating: Rating,
        review: Option<String>,
    ) -> Result<()>;

    /// Transactional delete; kernels drop by -1/-6 depending on review
    /// presence at deletion time.
    async fn delete_watched(&self, user_id: UserId, watched_id: WatchedId)
    -> Result<()>;

    /// Transactional watched -> watchlisted move: read the movie and review
    /// presence off the source row, delete it, debit kernels, and insert a
    /// watchlist row only if none exists. A concurrently removed source row
    /// is `NotFound` and rolls the whole transition back.
    async fn move_watched_to_watchlist(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<()>;

    /// All watched rows, most recently created first.
    async fn list_watched(&self, user_id: UserId) -> Result<Vec<WatchedItem>>;

    async fn get_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<WatchedDetail>;

    /// Membership markers for a batch of ids.
    async fn membership(
        &self,
        user_id: UserId,
        movie_ids: &[MovieId],
    ) -> Result<WatchMarkers>;
}
