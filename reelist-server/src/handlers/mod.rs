pub mod follows;
pub mod movies;
pub mod users;
pub mod watched;
pub mod watchlist;
