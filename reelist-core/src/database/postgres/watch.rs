//! Postgres watched/watchlist repository.
//!
//! Every state transition here is a single transaction: the row mutation and
//! its kernel delta commit together or not at all. Concurrent requests
//! touching the same (user, movie) pair serialize on the store's row locks,
//! not on anything in-process.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::database::ports::watch::{
    NewWatchlistEntry, WatchMarkers, WatchStore, WatchedDetail, WatchedItem,
    WatchlistItem,
};
use crate::database::postgres::ledger;
use crate::error::{CoreError, Result};
use crate::score;
use reelist_model::watch::review_present;
use reelist_model::{MovieId, Rating, UserId, WatchedId, WatchlistId};

#[derive(Clone, Debug)]
pub struct PostgresWatchStore {
    pool: PgPool,
}

impl PostgresWatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

/// Empty and whitespace-only reviews are stored as NULL.
fn normalize_review(review: Option<String>) -> Option<String> {
    review.filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl WatchStore for PostgresWatchStore {
    async fn add_watchlist_entry(
        &self,
        user_id: UserId,
        entry: NewWatchlistEntry,
    ) -> Result<WatchlistId> {
        let inserted: Option<WatchlistId> = sqlx::query_scalar(
            r#"
            INSERT INTO watchlist_entries (user_id, movie_id, priority, notes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            RETURNING watchlist_id
            "#,
        )
        .bind(user_id)
        .bind(entry.movie_id)
        .bind(entry.priority)
        .bind(&entry.notes)
        .fetch_optional(self.pool())
        .await?;

        inserted.ok_or_else(|| CoreError::conflict("movie already in watchlist"))
    }

    async fn remove_watchlist_entry(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM watchlist_entries WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("watchlist entry"));
        }
        Ok(())
    }

    async fn set_watchlist_priority(
        &self,
        user_id: UserId,
        watchlist_id: WatchlistId,
        priority: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE watchlist_entries
            SET priority = $1
            WHERE watchlist_id = $2 AND user_id = $3
            "#,
        )
        .bind(priority)
        .bind(watchlist_id)
        .bind(user_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("watchlist entry"));
        }
        Ok(())
    }

    async fn is_watchlisted(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM watchlist_entries
                WHERE user_id = $1 AND movie_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    async fn list_watchlist(&self, user_id: UserId) -> Result<Vec<WatchlistItem>> {
        let items = sqlx::query_as::<_, WatchlistItem>(
            r#"
            SELECT wl.watchlist_id, wl.priority, wl.notes, wl.added_at,
                   ce.movie_id, ce.title, ce.poster_url, ce.release_date
            FROM watchlist_entries wl
            JOIN catalog_entries ce ON wl.movie_id = ce.movie_id
            WHERE wl.user_id = $1
            ORDER BY wl.added_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    async fn mark_watched(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: Rating,
        review: Option<String>,
    ) -> Result<WatchedId> {
        let review = normalize_review(review);
        let has_review = review_present(review.as_deref());

        let mut tx = self.pool().begin().await?;

        let watched_id: WatchedId = match sqlx::query_scalar(
            r#"
            INSERT INTO watched_entries (user_id, movie_id, rating, review)
            VALUES ($1, $2, $3, $4)
            RETURNING watched_id
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(rating)
        .bind(&review)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(id) => id,
            Err(err) if is_unique_violation(&err) => {
                return Err(CoreError::conflict("movie already marked watched"));
            }
            Err(err) => return Err(err.into()),
        };

        // Defensive cleanup: the pair must never hold both rows.
        sqlx::query(
            "DELETE FROM watchlist_entries WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

        let delta = score::mark_watched_delta(has_review);
        ledger::apply_score_delta(&mut *tx, user_id, delta).await?;

        tx.commit().await?;

        debug!(%user_id, %movie_id, delta, "marked movie watched");
        Ok(watched_id)
    }

    async fn update_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
        rating: Rating,
        review: Option<String>,
    ) -> Result<()> {
        let review = normalize_review(review);

        let mut tx = self.pool().begin().await?;

        let old_review: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT review FROM watched_entries
            WHERE watched_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(watched_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(old_review) = old_review else {
            return Err(CoreError::not_found("watched entry"));
        };

        sqlx::query(
            r#"
            UPDATE watched_entries
            SET rating = $1, review = $2
            WHERE watched_id = $3 AND user_id = $4
            "#,
        )
        .bind(rating)
        .bind(&review)
        .bind(watched_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let delta = score::review_transition_delta(
            review_present(old_review.as_deref()),
            review_present(review.as_deref()),
        );
        if delta != 0 {
            ledger::apply_score_delta(&mut *tx, user_id, delta).await?;
        }

        tx.commit().await?;

        debug!(%user_id, %watched_id, delta, "updated watched entry");
        Ok(())
    }

    async fn delete_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        let review: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT review FROM watched_entries
            WHERE watched_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(watched_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(review) = review else {
            return Err(CoreError::not_found("watched entry"));
        };
        let has_review = review_present(review.as_deref());

        sqlx::query(
            "DELETE FROM watched_entries WHERE watched_id = $1 AND user_id = $2",
        )
        .bind(watched_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let delta = score::removal_delta(has_review);
        ledger::apply_score_delta(&mut *tx, user_id, delta).await?;

        tx.commit().await?;

        debug!(%user_id, %watched_id, delta, "deleted watched entry");
        Ok(())
    }

    async fn move_watched_to_watchlist(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        // Review presence decides the debit; a missing row means a
        // concurrent request already removed it and the whole transition
        // aborts with no effects.
        let source: Option<(MovieId, Option<String>)> = sqlx::query_as(
            r#"
            SELECT movie_id, review FROM watched_entries
            WHERE watched_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(watched_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((movie_id, review)) = source else {
            return Err(CoreError::not_found("watched entry"));
        };
        let has_review = review_present(review.as_deref());

        sqlx::query(
            "DELETE FROM watched_entries WHERE watched_id = $1 AND user_id = $2",
        )
        .bind(watched_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let delta = score::removal_delta(has_review);
        ledger::apply_score_delta(&mut *tx, user_id, delta).await?;

        // Idempotent destination insert: an existing watchlist row is kept
        // as-is, but the deletion and the debit above still happen.
        let existing: Option<WatchlistId> = sqlx::query_scalar(
            r#"
            SELECT watchlist_id FROM watchlist_entries
            WHERE user_id = $1 AND movie_id = $2
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_none() {
            sqlx::query(
                r#"
                INSERT INTO watchlist_entries (user_id, movie_id, priority)
                VALUES ($1, $2, FALSE)
                "#,
            )
            .bind(user_id)
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(%user_id, %watched_id, %movie_id, delta, "moved watched entry to watchlist");
        Ok(())
    }

    async fn list_watched(&self, user_id: UserId) -> Result<Vec<WatchedItem>> {
        let items = sqlx::query_as::<_, WatchedItem>(
            r#"
            SELECT we.watched_id, we.rating,
                   ce.movie_id, ce.title, ce.poster_url, ce.release_date
            FROM watched_entries we
            JOIN catalog_entries ce ON we.movie_id = ce.movie_id
            WHERE we.user_id = $1
            ORDER BY we.watched_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    async fn get_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<WatchedDetail> {
        let detail = sqlx::query_as::<_, WatchedDetail>(
            r#"
            SELECT we.watched_id, we.rating, we.review,
                   ce.movie_id, ce.title, ce.poster_url, ce.release_date
            FROM watched_entries we
            JOIN catalog_entries ce ON we.movie_id = ce.movie_id
            WHERE we.user_id = $1 AND we.watched_id = $2
            "#,
        )
        .bind(user_id)
        .bind(watched_id)
        .fetch_optional(self.pool())
        .await?;

        detail.ok_or_else(|| CoreError::not_found("watched entry"))
    }

    async fn membership(
        &self,
        user_id: UserId,
        movie_ids: &[MovieId],
    ) -> Result<WatchMarkers> {
        if movie_ids.is_empty() {
            return Ok(WatchMarkers::default());
        }
        let raw_ids: Vec<i64> = movie_ids.iter().map(MovieId::as_i64).collect();

        let watched_rows: Vec<(MovieId, WatchedId)> = sqlx::query_as(
            r#"
            SELECT movie_id, watched_id FROM watched_entries
            WHERE user_id = $1 AND movie_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(&raw_ids)
        .fetch_all(self.pool())
        .await?;

        let watchlist_rows: Vec<(MovieId,)> = sqlx::query_as(
            r#"
            SELECT movie_id FROM watchlist_entries
            WHERE user_id = $1 AND movie_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(&raw_ids)
        .fetch_all(self.pool())
        .await?;

        Ok(WatchMarkers {
            watched: watched_rows.into_iter().collect::<HashMap<_, _>>(),
            watchlisted: watchlist_rows
                .into_iter()
                .map(|(movie_id,)| movie_id)
                .collect::<HashSet<_>>(),
        })
    }
}
