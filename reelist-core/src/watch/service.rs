//! Application-level watched/watchlist operations.
//!
//! Every transition that can create a reference to a movie goes through the
//! catalog reconciler first, so a row in `watched_entries` or
//! `watchlist_entries` always points at a catalog row that was upstream-fresh
//! at insert time.

use std::sync::Arc;
use tracing::debug;

use crate::catalog::CatalogReconciler;
use crate::database::ports::watch::{
    NewWatchlistEntry, WatchMarkers, WatchStore, WatchedDetail, WatchedItem,
    WatchlistItem,
};
use crate::error::Result;
use reelist_model::{MovieId, Rating, UserId, WatchedId, WatchlistId};

#[derive(Clone)]
pub struct WatchService {
    reconciler: CatalogReconciler,
    store: Arc<dyn WatchStore>,
}

impl std::fmt::Debug for WatchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchService")
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

impl WatchService {
    pub fn new(reconciler: CatalogReconciler, store: Arc<dyn WatchStore>) -> Self {
        Self { reconciler, store }
    }

    /// Record a movie as watched with a rating and optional review.
    ///
    /// The catalog row is reconciled first; if that fails fatally the ledger
    /// and the watched table are untouched.
    pub async fn mark_watched(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: Rating,
        review: Option<String>,
    ) -> Result<WatchedId> {
        let outcome = self.reconciler.ensure_fresh(movie_id).await?;
        debug!(%movie_id, ?outcome, "catalog reconciled before mark-watched");
        self.store
            .mark_watched(user_id, movie_id, rating, review)
            .await
    }

    /// Add a movie to the watchlist, reconciling the catalog row first.
    pub async fn add_to_watchlist(
        &self,
        user_id: UserId,
        entry: NewWatchlistEntry,
    ) -> Result<WatchlistId> {
        let outcome = self.reconciler.ensure_fresh(entry.movie_id).await?;
        debug!(movie_id = %entry.movie_id, ?outcome, "catalog reconciled before watchlist add");
        self.store.add_watchlist_entry(user_id, entry).await
    }

    pub async fn update_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
        rating: Rating,
        review: Option<String>,
    ) -> Result<()> {
        self.store
            .update_watched(user_id, watched_id, rating, review)
            .await
    }

    pub async fn delete_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<()> {
        self.store.delete_watched(user_id, watched_id).await
    }

    pub async fn move_watched_to_watchlist(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<()> {
        self.store.move_watched_to_watchlist(user_id, watched_id).await
    }

    pub async fn remove_from_watchlist(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<()> {
        self.store.remove_watchlist_entry(user_id, movie_id).await
    }

    pub async fn set_watchlist_priority(
        &self,
        user_id: UserId,
        watchlist_id: WatchlistId,
        priority: bool,
    ) -> Result<()> {
        self.store
            .set_watchlist_priority(user_id, watchlist_id, priority)
            .await
    }

    pub async fn list_watched(&self, user_id: UserId) -> Result<Vec<WatchedItem>> {
        self.store.list_watched(user_id).await
    }

    pub async fn get_watched(
        &self,
        user_id: UserId,
        watched_id: WatchedId,
    ) -> Result<WatchedDetail> {
        self.store.get_watched(user_id, watched_id).await
    }

    pub async fn is_watchlisted(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<bool> {
        self.store.is_watchlisted(user_id, movie_id).await
    }

    pub async fn list_watchlist(
        &self,
        user_id: UserId,
    ) -> Result<Vec<WatchlistItem>> {
        self.store.list_watchlist(user_id).await
    }

    pub async fn membership(
        &self,
        user_id: UserId,
        movie_ids: &[MovieId],
    ) -> Result<WatchMarkers> {
        self.store.membership(user_id, movie_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::movies::MockMovieStore;
    use crate::database::ports::watch::MockWatchStore;
    use crate::error::CoreError;
    use crate::providers::tmdb::{Genre, MockCatalogProvider, MovieDetails, ProviderError};
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn details(id: i64) -> MovieDetails {
        MovieDetails {
            id,
            title: "Heat".to_string(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15),
            runtime: Some(170),
            genres: vec![Genre {
                id: 80,
                name: "Crime".to_string(),
            }],
            poster_path: None,
            overview: None,
            adult: false,
            original_language: Some("en".to_string()),
        }
    }

    fn fresh_catalog(movie_id: i64) -> CatalogReconciler {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();
        movies.expect_head().returning(|_| Ok(None));
        provider
            .expect_fetch_movie()
            .returning(move |_| Ok(details(movie_id)));
        provider
            .expect_fetch_certification()
            .returning(|_| Ok(Some("R".to_string())));
        movies.expect_upsert().returning(|_| Ok(()));
        CatalogReconciler::new(
            Arc::new(provider),
            Arc::new(movies),
            "https://image.tmdb.org/t/p",
        )
    }

    fn broken_catalog() -> CatalogReconciler {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();
        movies.expect_head().returning(|_| Ok(None));
        provider
            .expect_fetch_movie()
            .returning(|_| Err(ProviderError::ApiError("down".to_string())));
        CatalogReconciler::new(
            Arc::new(provider),
            Arc::new(movies),
            "https://image.tmdb.org/t/p",
        )
    }

    #[tokio::test]
    async fn upstream_failure_blocks_mark_watched() {
        let mut store = MockWatchStore::new();
        store.expect_mark_watched().never();

        let service = WatchService::new(broken_catalog(), Arc::new(store));
        let result = service
            .mark_watched(
                UserId::new(1),
                MovieId::new(949),
                Rating::new(9.0).unwrap(),
                None,
            )
            .await;
        assert!(matches!(result, Err(CoreError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn upstream_failure_blocks_watchlist_add() {
        let mut store = MockWatchStore::new();
        store.expect_add_watchlist_entry().never();

        let service = WatchService::new(broken_catalog(), Arc::new(store));
        let result = service
            .add_to_watchlist(
                UserId::new(1),
                NewWatchlistEntry {
                    movie_id: MovieId::new(949),
                    priority: false,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(CoreError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn mark_watched_reconciles_then_inserts() {
        let mut store = MockWatchStore::new();
        store
            .expect_mark_watched()
            .withf(|user, movie, rating, review| {
                *user == UserId::new(1)
                    && *movie == MovieId::new(949)
                    && rating.value() == 9.0
                    && review.as_deref() == Some("slaps")
            })
            .returning(|_, _, _, _| Ok(WatchedId::new(42)));

        let service = WatchService::new(fresh_catalog(949), Arc::new(store));
        let id = service
            .mark_watched(
                UserId::new(1),
                MovieId::new(949),
                Rating::new(9.0).unwrap(),
                Some("slaps".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(id, WatchedId::new(42));
    }

    #[tokio::test]
    async fn duplicate_watched_surfaces_conflict() {
        let mut store = MockWatchStore::new();
        store
            .expect_mark_watched()
            .returning(|_, _, _, _| Err(CoreError::conflict("movie already marked watched")));

        let service = WatchService::new(fresh_catalog(949), Arc::new(store));
        let result = service
            .mark_watched(
                UserId::new(1),
                MovieId::new(949),
                Rating::new(7.5).unwrap(),
                None,
            )
            .await;
        assert!(matches!(result, Err(CoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn move_passes_through_not_found() {
        let mut store = MockWatchStore::new();
        store
            .expect_move_watched_to_watchlist()
            .with(eq(UserId::new(1)), eq(WatchedId::new(5)))
            .returning(|_, _| Err(CoreError::not_found("watched entry")));

        let service = WatchService::new(fresh_catalog(949), Arc::new(store));
        let result = service
            .move_watched_to_watchlist(UserId::new(1), WatchedId::new(5))
            .await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }
}
