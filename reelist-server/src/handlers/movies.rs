//! Catalog endpoints: search and detail.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;
use crate::infra::identity::Identity;
use reelist_core::providers::PosterSize;
use reelist_model::{CatalogEntry, MovieId, WatchedId};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// A search hit annotated with the caller's own state for the movie.
#[derive(Debug, Serialize)]
pub struct AnnotatedSearchHit {
    pub movie_id: MovieId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
    /// Set when the caller has already marked this movie watched.
    pub watched_id: Option<WatchedId>,
    pub in_watchlist: bool,
}

/// At most this many hits are returned per search.
const SEARCH_RESULT_CAP: usize = 50;

/// Search the upstream catalog and annotate each hit with whether the caller
/// has it watched or watchlisted. Annotation comes from two batched local
/// queries, not one per hit.
pub async fn search_movies(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Query(search): Query<SearchQuery>,
) -> AppResult<Json<Vec<AnnotatedSearchHit>>> {
    let query = search.query.trim();
    if query.is_empty() {
        return Err(AppError::bad_request("query must not be empty"));
    }

    // Adult titles and posterless entries are not worth showing.
    let hits: Vec<_> = state
        .provider
        .search_movies(query)
        .await?
        .into_iter()
        .filter(|hit| !hit.adult && hit.poster_path.is_some())
        .take(SEARCH_RESULT_CAP)
        .collect();
    let ids: Vec<MovieId> =
        hits.iter().map(|hit| MovieId::new(hit.id)).collect();
    let markers = state.watch.membership(user_id, &ids).await?;

    let image_base = &state.settings.tmdb.image_base_url;
    let annotated = hits
        .into_iter()
        .map(|hit| {
            let movie_id = MovieId::new(hit.id);
            AnnotatedSearchHit {
                movie_id,
                title: hit.title,
                release_date: hit.release_date,
                poster_url: hit.poster_path.as_deref().map(|path| {
                    reelist_core::providers::tmdb::poster_url(
                        image_base,
                        PosterSize::W185,
                        path,
                    )
                }),
                watched_id: markers.watched.get(&movie_id).copied(),
                in_watchlist: markers.watchlisted.contains(&movie_id),
            }
        })
        .collect();

    Ok(Json(annotated))
}

/// Fetch a movie's catalog record, reconciling it against upstream first so
/// the response never shows a record for a recycled identifier.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<CatalogEntry>> {
    state.catalog.ensure_fresh(movie_id).await?;
    let entry = state
        .movies
        .get(movie_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("movie {movie_id}")))?;
    Ok(Json(entry))
}
