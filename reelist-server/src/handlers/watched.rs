//! Watched-collection endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;
use crate::infra::identity::Identity;
use reelist_core::database::ports::{WatchedDetail, WatchedItem};
use reelist_model::{MovieId, Rating, WatchedId};

#[derive(Debug, Deserialize)]
pub struct MarkWatchedRequest {
    pub movie_id: MovieId,
    /// Raw rating; validated and rounded to one decimal.
    pub rating: f32,
    pub review: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWatchedRequest {
    pub rating: f32,
    pub review: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkWatchedResponse {
    pub watched_id: WatchedId,
}

pub async fn list_watched(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> AppResult<Json<Vec<WatchedItem>>> {
    Ok(Json(state.watch.list_watched(user_id).await?))
}

pub async fn get_watched(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(watched_id): Path<WatchedId>,
) -> AppResult<Json<WatchedDetail>> {
    Ok(Json(state.watch.get_watched(user_id, watched_id).await?))
}

pub async fn mark_watched(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(request): Json<MarkWatchedRequest>,
) -> AppResult<(StatusCode, Json<MarkWatchedResponse>)> {
    let rating = Rating::new(request.rating)?;
    let watched_id = state
        .watch
        .mark_watched(user_id, request.movie_id, rating, request.review)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MarkWatchedResponse { watched_id }),
    ))
}

pub async fn update_watched(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(watched_id): Path<WatchedId>,
    Json(request): Json<UpdateWatchedRequest>,
) -> AppResult<StatusCode> {
    let rating = Rating::new(request.rating)?;
    state
        .watch
        .update_watched(user_id, watched_id, rating, request.review)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_watched(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(watched_id): Path<WatchedId>,
) -> AppResult<StatusCode> {
    state.watch.delete_watched(user_id, watched_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Demote a watched entry back onto the watchlist in one transaction.
pub async fn move_to_watchlist(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(watched_id): Path<WatchedId>,
) -> AppResult<StatusCode> {
    state
        .watch
        .move_watched_to_watchlist(user_id, watched_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
