//! Watchlist endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;
use crate::infra::identity::Identity;
use reelist_core::database::ports::{NewWatchlistEntry, WatchlistItem};
use reelist_model::{MovieId, WatchlistId};

#[derive(Debug, Deserialize)]
pub struct AddWatchlistRequest {
    pub movie_id: MovieId,
    #[serde(default)]
    pub priority: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPriorityRequest {
    pub priority: bool,
}

#[derive(Debug, Serialize)]
pub struct AddWatchlistResponse {
    pub watchlist_id: WatchlistId,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub in_watchlist: bool,
}

pub async fn list_watchlist(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    Ok(Json(state.watch.list_watchlist(user_id).await?))
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(request): Json<AddWatchlistRequest>,
) -> AppResult<(StatusCode, Json<AddWatchlistResponse>)> {
    let watchlist_id = state
        .watch
        .add_to_watchlist(
            user_id,
            NewWatchlistEntry {
                movie_id: request.movie_id,
                priority: request.priority,
                notes: request.notes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AddWatchlistResponse { watchlist_id }),
    ))
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(movie_id): Path<MovieId>,
) -> AppResult<StatusCode> {
    state.watch.remove_from_watchlist(user_id, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_membership(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<MembershipResponse>> {
    let in_watchlist = state.watch.is_watchlisted(user_id, movie_id).await?;
    Ok(Json(MembershipResponse { in_watchlist }))
}

pub async fn set_priority(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(watchlist_id): Path<WatchlistId>,
    Json(request): Json<SetPriorityRequest>,
) -> AppResult<StatusCode> {
    state
        .watch
        .set_watchlist_priority(user_id, watchlist_id, request.priority)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
