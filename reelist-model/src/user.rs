//! User profile data.

use crate::ids::{MovieId, UserId};
use serde::{Deserialize, Serialize};

/// A user's profile as stored.
///
/// `popcorn_kernels` is the gamification score maintained by the scoring
/// ledger; it is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub favorite_movie: Option<MovieId>,
    pub popcorn_kernels: i64,
}

/// A user appearing in a follower/following listing, annotated with whether
/// the viewing user follows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowPeer {
    pub user_id: UserId,
    pub username: String,
    pub is_following: bool,
}
