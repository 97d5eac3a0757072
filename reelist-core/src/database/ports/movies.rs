//! Catalog cache storage port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use reelist_model::{CatalogEntry, GenreSlots, MovieId};

/// The fields the reconciler compares against upstream data.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MovieHead {
    pub title: String,
    pub release_date: Option<NaiveDate>,
}

/// A full catalog record ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogUpsert {
    pub movie_id: MovieId,
    pub title: String,
    pub runtime_minutes: i32,
    pub certification: Option<String>,
    pub language: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
    pub adult: bool,
    pub overview: Option<String>,
    pub genres: GenreSlots,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// The locally cached title and release date, if the id is cached.
    async fn head(&self, movie_id: MovieId) -> Result<Option<MovieHead>>;

    /// The full cached record.
    async fn get(&self, movie_id: MovieId) -> Result<Option<CatalogEntry>>;

    /// Remove a stale record and every watched/watchlist row that references
    /// it, in one transaction. Dependents go first so no reference is ever
    /// left dangling.
    async fn purge(&self, movie_id: MovieId) -> Result<()>;

    /// Insert or update the record keyed by its movie id.
    async fn upsert(&self, record: &CatalogUpsert) -> Result<()>;
}
