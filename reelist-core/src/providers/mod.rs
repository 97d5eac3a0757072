//! External catalog provider integrations.

pub mod tmdb;

pub use tmdb::{
    CatalogProvider, MovieDetails, MovieSearchHit, PosterSize, ProviderError,
    TmdbProvider, TmdbSettings,
};

#[cfg(test)]
pub use tmdb::MockCatalogProvider;
