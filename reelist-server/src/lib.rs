//! # Reelist Server
//!
//! HTTP API for Reelist, a social movie tracker backed by PostgreSQL with a
//! TMDB-reconciled catalog cache. Authentication happens upstream; requests
//! arrive with the caller's id in the `x-user-id` header.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use errors::{AppError, AppResult};
pub use infra::app_state::AppState;
