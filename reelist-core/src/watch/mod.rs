//! Watched/watchlist state machine.

pub mod service;

pub use service::WatchService;
