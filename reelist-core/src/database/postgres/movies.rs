//! Postgres catalog cache repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::database::ports::movies::{CatalogUpsert, MovieHead, MovieStore};
use crate::error::Result;
use reelist_model::{CatalogEntry, MovieId};
use reelist_model::movie::GenreColumns;

#[derive(Clone, Debug)]
pub struct PostgresMovieStore {
    pool: PgPool,
}

impl PostgresMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MovieStore for PostgresMovieStore {
    async fn head(&self, movie_id: MovieId) -> Result<Option<MovieHead>> {
        let head = sqlx::query_as::<_, MovieHead>(
            r#"
            SELECT title, release_date
            FROM catalog_entries
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(head)
    }

    async fn get(&self, movie_id: MovieId) -> Result<Option<CatalogEntry>> {
        let entry = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT movie_id, title, runtime_minutes, certification, language,
                   release_date, poster_path, poster_url, adult, overview,
                   genre_01, genre_02, genre_03, genre_04, genre_05,
                   genre_06, genre_07, genre_08, genre_09, genre_10,
                   refreshed_at
            FROM catalog_entries
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(entry)
    }

    async fn purge(&self, movie_id: MovieId) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        // Dependents first, catalog row last.
        let watched = sqlx::query("DELETE FROM watched_entries WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;
        let watchlisted =
            sqlx::query("DELETE FROM watchlist_entries WHERE movie_id = $1")
                .bind(movie_id)
                .execute(&mut *tx)
                .await?;
        sqlx::query("DELETE FROM catalog_entries WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            %movie_id,
            watched = watched.rows_affected(),
            watchlisted = watchlisted.rows_affected(),
            "purged stale catalog entry and its dependents"
        );
        Ok(())
    }

    async fn upsert(&self, record: &CatalogUpsert) -> Result<()> {
        let genres = GenreColumns::from(record.genres);

        sqlx::query(
            r#"
            INSERT INTO catalog_entries (
                movie_id, title, runtime_minutes, certification, language,
                release_date, poster_path, poster_url, adult, overview,
                genre_01, genre_02, genre_03, genre_04, genre_05,
                genre_06, genre_07, genre_08, genre_09, genre_10,
                refreshed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                    now())
            ON CONFLICT (movie_id) DO UPDATE SET
                title = EXCLUDED.title,
                runtime_minutes = EXCLUDED.runtime_minutes,
                certification = EXCLUDED.certification,
                language = EXCLUDED.language,
                release_date = EXCLUDED.release_date,
                poster_path = EXCLUDED.poster_path,
                poster_url = EXCLUDED.poster_url,
                adult = EXCLUDED.adult,
                overview = EXCLUDED.overview,
                genre_01 = EXCLUDED.genre_01,
                genre_02 = EXCLUDED.genre_02,
                genre_03 = EXCLUDED.genre_03,
                genre_04 = EXCLUDED.genre_04,
                genre_05 = EXCLUDED.genre_05,
                genre_06 = EXCLUDED.genre_06,
                genre_07 = EXCLUDED.genre_07,
                genre_08 = EXCLUDED.genre_08,
                genre_09 = EXCLUDED.genre_09,
                genre_10 = EXCLUDED.genre_10,
                refreshed_at = EXCLUDED.refreshed_at
            "#,
        )
        .bind(record.movie_id)
        .bind(&record.title)
        .bind(record.runtime_minutes)
        .bind(&record.certification)
        .bind(&record.language)
        .bind(record.release_date)
        .bind(&record.poster_path)
        .bind(&record.poster_url)
        .bind(record.adult)
        .bind(&record.overview)
        .bind(genres.genre_01)
        .bind(genres.genre_02)
        .bind(genres.genre_03)
        .bind(genres.genre_04)
        .bind(genres.genre_05)
        .bind(genres.genre_06)
        .bind(genres.genre_07)
        .bind(genres.genre_08)
        .bind(genres.genre_09)
        .bind(genres.genre_10)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
