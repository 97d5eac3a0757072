//! Storage layer: ports and their Postgres implementations.

pub mod ports;
pub mod postgres;

/// Embedded migrations, runnable at startup or from `sqlx::test`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
