//! Postgres user profile repository and dashboard aggregates.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::ports::users::{
    DashboardSnapshot, MovieCard, ProfileUpdate, UserStore,
};
use crate::database::postgres::ledger;
use crate::error::{CoreError, Result};
use reelist_model::{UserId, UserProfile};

#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FollowCounts {
    follower_count: i64,
    following_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct WatchedStats {
    total_movies: i64,
    avg_rating: Option<f64>,
    ten_star_count: i64,
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn profile(&self, user_id: UserId) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, username, title, bio, favorite_movie, popcorn_kernels
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        profile.ok_or_else(|| CoreError::not_found(format!("user {user_id}")))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $1, title = $2, bio = $3, favorite_movie = $4
            WHERE user_id = $5
            "#,
        )
        .bind(&update.username)
        .bind(&update.title)
        .bind(&update.bio)
        .bind(update.favorite_movie)
        .bind(user_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn apply_score_delta(&self, user_id: UserId, delta: i64) -> Result<i64> {
        ledger::apply_score_delta(self.pool(), user_id, delta).await
    }

    async fn dashboard(&self, user_id: UserId) -> Result<DashboardSnapshot> {
        let profile = self.profile(user_id).await?;

        let follows = sqlx::query_as::<_, FollowCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM user_follows WHERE following_id = $1) AS follower_count,
                (SELECT COUNT(*) FROM user_follows WHERE follower_id = $1) AS following_count
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        let stats = sqlx::query_as::<_, WatchedStats>(
            r#"
            SELECT COUNT(*) AS total_movies,
                   ROUND(AVG(rating)::numeric, 2)::float8 AS avg_rating,
                   COUNT(*) FILTER (WHERE rating = 10.0) AS ten_star_count
            FROM watched_entries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        let favorite = sqlx::query_as::<_, MovieCard>(
            r#"
            SELECT we.watched_id, we.rating, ce.title, ce.poster_url
            FROM users u
            JOIN watched_entries we ON u.user_id = we.user_id
            JOIN catalog_entries ce ON ce.movie_id = we.movie_id
            WHERE u.user_id = $1 AND we.movie_id = u.favorite_movie
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        let last_watched = sqlx::query_as::<_, MovieCard>(
            r#"
            SELECT we.watched_id, we.rating, ce.title, ce.poster_url
            FROM watched_entries we
            JOIN catalog_entries ce ON we.movie_id = ce.movie_id
            WHERE we.user_id = $1
            ORDER BY we.watched_id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(DashboardSnapshot {
            profile,
            follower_count: follows.follower_count,
            following_count: follows.following_count,
            total_movies: stats.total_movies,
            avg_rating: stats.avg_rating,
            ten_star_count: stats.ten_star_count,
            favorite,
            last_watched,
        })
    }
}
