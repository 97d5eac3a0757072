//! Watched and watchlist rows.
//!
//! The core correctness property of the platform lives here: for any
//! (user, movie) pair, at most one [`WatchedEntry`] and at most one
//! [`WatchlistEntry`] exist, and never both at once. Absence of both rows is
//! the implicit `Unwatched` state.

use crate::ids::{MovieId, UserId, WatchedId, WatchlistId};
use crate::rating::Rating;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The state of a (user, movie) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    /// No rows exist for the pair.
    Unwatched,
    /// A watchlist row exists.
    Watchlisted,
    /// A watched row exists.
    Watched,
}

/// A movie the user has marked as viewed, with rating and optional review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchedEntry {
    pub watched_id: WatchedId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: Rating,
    pub review: Option<String>,
    /// Creation time; `watched_id` order doubles as the recency marker.
    pub created_at: DateTime<Utc>,
}

impl WatchedEntry {
    /// Whether the entry carries a non-empty review. Whitespace-only text
    /// counts as no review, matching the scoring policy.
    pub fn has_review(&self) -> bool {
        review_present(self.review.as_deref())
    }
}

/// A movie the user intends to watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub watchlist_id: WatchlistId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub priority: bool,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Whether review text is considered present: trimmed length > 0.
pub fn review_present(review: Option<&str>) -> bool {
    review.is_some_and(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_review_counts_as_empty() {
        assert!(!review_present(None));
        assert!(!review_present(Some("")));
        assert!(!review_present(Some("   \n\t")));
        assert!(review_present(Some("loved it")));
        assert!(review_present(Some("  ok  ")));
    }
}
