use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::handlers::{follows, movies, users, watched, watchlist};
use crate::infra::app_state::AppState;

/// Create all v1 API routes.
///
/// Every route reads the caller from the `x-user-id` header except the
/// catalog detail lookup, which has no per-user state.
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/movies/search", get(movies::search_movies))
        .route("/movies/{id}", get(movies::get_movie))
        // Watched collection
        .route("/watched", get(watched::list_watched))
        .route("/watched", post(watched::mark_watched))
        .route("/watched/{id}", get(watched::get_watched))
        .route("/watched/{id}", put(watched::update_watched))
        .route("/watched/{id}", delete(watched::delete_watched))
        .route(
            "/watched/{id}/move-to-watchlist",
            post(watched::move_to_watchlist),
        )
        // Watchlist
        .route("/watchlist", get(watchlist::list_watchlist))
        .route("/watchlist", post(watchlist::add_to_watchlist))
        // {id} is the movie id on the two membership routes and the
        // watchlist row id on the priority route.
        .route("/watchlist/{id}", delete(watchlist::remove_from_watchlist))
        .route("/watchlist/check/{id}", get(watchlist::check_membership))
        .route("/watchlist/{id}/priority", patch(watchlist::set_priority))
        // Profile and dashboard
        .route("/users/me/profile", get(users::get_profile))
        .route("/users/me/profile", put(users::update_profile))
        .route("/users/me/dashboard", get(users::get_dashboard))
        // Follow graph
        .route("/users/{id}/follow", post(follows::follow_user))
        .route("/users/{id}/follow", delete(follows::unfollow_user))
        .route("/users/{id}/followers", get(follows::list_followers))
        .route("/users/{id}/following", get(follows::list_following))
}
