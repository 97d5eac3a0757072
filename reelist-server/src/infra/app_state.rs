use std::{fmt, sync::Arc};

use sqlx::PgPool;

use crate::infra::config::Settings;
use reelist_core::catalog::CatalogReconciler;
use reelist_core::database::ports::{FollowStore, MovieStore, UserStore};
use reelist_core::database::postgres::{
    PostgresFollowStore, PostgresMovieStore, PostgresUserStore,
    PostgresWatchStore,
};
use reelist_core::providers::{CatalogProvider, TmdbProvider};
use reelist_core::watch::WatchService;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub watch: WatchService,
    pub catalog: CatalogReconciler,
    pub provider: Arc<dyn CatalogProvider>,
    pub movies: Arc<dyn MovieStore>,
    pub users: Arc<dyn UserStore>,
    pub follows: Arc<dyn FollowStore>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the Postgres stores and the TMDB provider into one state object.
    pub fn new(settings: Settings, pool: PgPool) -> anyhow::Result<Self> {
        let provider: Arc<dyn CatalogProvider> =
            Arc::new(TmdbProvider::new(settings.tmdb.clone())?);
        let movies: Arc<dyn MovieStore> =
            Arc::new(PostgresMovieStore::new(pool.clone()));
        let catalog = CatalogReconciler::new(
            Arc::clone(&provider),
            Arc::clone(&movies),
            settings.tmdb.image_base_url.clone(),
        );
        let watch = WatchService::new(
            catalog.clone(),
            Arc::new(PostgresWatchStore::new(pool.clone())),
        );

        Ok(Self {
            settings: Arc::new(settings),
            watch,
            catalog,
            provider,
            movies,
            users: Arc::new(PostgresUserStore::new(pool.clone())),
            follows: Arc::new(PostgresFollowStore::new(pool)),
        })
    }
}
