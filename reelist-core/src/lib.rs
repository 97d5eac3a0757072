//! # Reelist Core
//!
//! Core library for the Reelist server: catalog caching against TMDB,
//! the popcorn-kernel scoring ledger, and the watched/watchlist state
//! machine, backed by PostgreSQL.
//!
//! ## Overview
//!
//! - **Catalog cache**: every write that references a movie re-fetches the
//!   upstream record first, detecting recycled TMDB identifiers and purging
//!   stale rows together with their dependents ([`catalog`])
//! - **Scoring ledger**: popcorn kernels credited and debited alongside
//!   watched-row transitions, floored at zero ([`score`])
//! - **Watch state**: a movie is watched or watchlisted for a user, never
//!   both; transitions are single transactions ([`watch`])
//! - **Database abstraction**: trait-based stores with a PostgreSQL
//!   implementation ([`database`])
//!
//! Storage ports live in [`database::ports`] and carry `mockall` mocks under
//! `cfg(test)`; the PostgreSQL implementations live in
//! [`database::postgres`].

pub mod catalog;
pub mod database;
pub mod error;
pub mod providers;
pub mod score;
pub mod stats;
pub mod watch;

pub use catalog::{CatalogReconciler, EnsureOutcome};
pub use error::{CoreError, Result};
pub use watch::WatchService;
