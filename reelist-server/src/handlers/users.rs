//! Profile and dashboard endpoints.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;
use crate::infra::identity::Identity;
use reelist_core::database::ports::{DashboardSnapshot, ProfileUpdate};
use reelist_core::stats;
use reelist_model::{MovieId, UserProfile};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub favorite_movie: Option<MovieId>,
}

/// Watermarks the client last displayed; each omitted on first load.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub acknowledged_kernels: Option<i64>,
    pub acknowledged_followers: Option<i64>,
    pub acknowledged_following: Option<i64>,
    pub acknowledged_ten_star: Option<i64>,
}

/// "+N since last visit" badges computed from the caller's watermarks.
#[derive(Debug, Serialize)]
pub struct DashboardDeltas {
    pub kernels: i64,
    pub followers: i64,
    pub following: i64,
    pub ten_star: i64,
}

/// Dashboard aggregate plus delta badges. The client stores the counters
/// from this response and sends them back as `acknowledged_*` query
/// parameters next time; the server keeps no per-view counter state.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
    pub deltas: DashboardDeltas,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.users.profile(user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<StatusCode> {
    state
        .users
        .update_profile(
            user_id,
            ProfileUpdate {
                username: request.username,
                title: request.title,
                bio: request.bio,
                favorite_movie: request.favorite_movie,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let snapshot = state.users.dashboard(user_id).await?;
    let deltas = DashboardDeltas {
        kernels: stats::acknowledged_delta(
            snapshot.profile.popcorn_kernels,
            query.acknowledged_kernels,
        ),
        followers: stats::acknowledged_delta(
            snapshot.follower_count,
            query.acknowledged_followers,
        ),
        following: stats::acknowledged_delta(
            snapshot.following_count,
            query.acknowledged_following,
        ),
        ten_star: stats::acknowledged_delta(
            snapshot.ten_star_count,
            query.acknowledged_ten_star,
        ),
    };
    Ok(Json(DashboardResponse { snapshot, deltas }))
}
