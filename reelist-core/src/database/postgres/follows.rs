//! Postgres follow graph repository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::ports::follows::FollowStore;
use crate::error::{CoreError, Result};
use reelist_model::{FollowPeer, UserId};

#[derive(Clone, Debug)]
pub struct PostgresFollowStore {
    pool: PgPool,
}

impl PostgresFollowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FollowStore for PostgresFollowStore {
    async fn follow(&self, follower: UserId, following: UserId) -> Result<()> {
        if follower == following {
            return Err(CoreError::Validation(
                "cannot follow yourself".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO user_follows (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(follower)
        .bind(following)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            // An unknown target id trips the foreign key, not a 500.
            Err(sqlx::Error::Database(db))
                if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation =>
            {
                Err(CoreError::not_found(format!("user {following}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn unfollow(&self, follower: UserId, following: UserId) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM user_follows
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower)
        .bind(following)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn followers_of(
        &self,
        target: UserId,
        viewer: UserId,
    ) -> Result<Vec<FollowPeer>> {
        let peers = sqlx::query_as::<_, FollowPeer>(
            r#"
            SELECT u.user_id, u.username,
                   EXISTS(
                       SELECT 1 FROM user_follows
                       WHERE follower_id = $1 AND following_id = u.user_id
                   ) AS is_following
            FROM user_follows uf
            JOIN users u ON uf.follower_id = u.user_id
            WHERE uf.following_id = $2
            ORDER BY u.username ASC
            "#,
        )
        .bind(viewer)
        .bind(target)
        .fetch_all(self.pool())
        .await?;

        Ok(peers)
    }

    async fn following_of(
        &self,
        target: UserId,
        viewer: UserId,
    ) -> Result<Vec<FollowPeer>> {
        let peers = sqlx::query_as::<_, FollowPeer>(
            r#"
            SELECT u.user_id, u.username,
                   EXISTS(
                       SELECT 1 FROM user_follows
                       WHERE follower_id = $1 AND following_id = u.user_id
                   ) AS is_following
            FROM user_follows uf
            JOIN users u ON uf.following_id = u.user_id
            WHERE uf.follower_id = $2
            ORDER BY u.username ASC
            "#,
        )
        .bind(viewer)
        .bind(target)
        .fetch_all(self.pool())
        .await?;

        Ok(peers)
    }
}
