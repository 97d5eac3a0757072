//! User profile and dashboard storage port.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use reelist_model::{MovieId, Rating, UserId, UserProfile, WatchedId};

/// Profile fields a user may edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileUpdate {
    pub username: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub favorite_movie: Option<MovieId>,
}

/// A small watched-movie card shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MovieCard {
    pub watched_id: WatchedId,
    pub rating: Rating,
    pub title: String,
    pub poster_url: Option<String>,
}

/// Aggregate profile statistics, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub profile: UserProfile,
    pub follower_count: i64,
    pub following_count: i64,
    pub total_movies: i64,
    /// Average rating rounded to two decimals; `None` with no watched rows.
    pub avg_rating: Option<f64>,
    pub ten_star_count: i64,
    pub favorite: Option<MovieCard>,
    pub last_watched: Option<MovieCard>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The stored profile; an unknown user is `NotFound`.
    async fn profile(&self, user_id: UserId) -> Result<UserProfile>;

    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<()>;

    /// Apply a kernel delta, clamped to zero at the mutation boundary, and
    /// return the new balance. This is the scoring ledger's single write
    /// path for standalone adjustments; transitions apply their deltas
    /// inside their own transactions with the same floor semantics.
    async fn apply_score_delta(&self, user_id: UserId, delta: i64) -> Result<i64>;

    /// One-shot dashboard aggregate.
    async fn dashboard(&self, user_id: UserId) -> Result<DashboardSnapshot>;
}
