//! Follow graph endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;
use crate::infra::identity::Identity;
use reelist_model::{FollowPeer, UserId};

pub async fn follow_user(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(target): Path<UserId>,
) -> AppResult<StatusCode> {
    state.follows.follow(user_id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(target): Path<UserId>,
) -> AppResult<StatusCode> {
    state.follows.unfollow(user_id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_followers(
    State(state): State<AppState>,
    Identity(viewer): Identity,
    Path(target): Path<UserId>,
) -> AppResult<Json<Vec<FollowPeer>>> {
    Ok(Json(state.follows.followers_of(target, viewer).await?))
}

pub async fn list_following(
    State(state): State<AppState>,
    Identity(viewer): Identity,
    Path(target): Path<UserId>,
) -> AppResult<Json<Vec<FollowPeer>>> {
    Ok(Json(state.follows.following_of(target, viewer).await?))
}
