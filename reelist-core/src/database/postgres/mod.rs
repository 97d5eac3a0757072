//! Postgres implementations of the storage ports.

pub mod follows;
pub mod ledger;
pub mod movies;
pub mod users;
pub mod watch;

pub use follows::PostgresFollowStore;
pub use movies::PostgresMovieStore;
pub use users::PostgresUserStore;
pub use watch::PostgresWatchStore;
