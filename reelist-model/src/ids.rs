//! Strongly typed identifiers.
//!
//! External movie identifiers come from the catalog provider and are not
//! guaranteed stable over time; they are normalized to a single canonical
//! `i64` representation at the ingestion boundary so no lookup ever has to
//! juggle string and numeric keys.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a registered user. Assigned locally, stable.
    UserId
);

id_type!(
    /// External catalog identifier of a movie (TMDB id). The upstream
    /// provider has been observed to recycle these for unrelated titles, so a
    /// `MovieId` alone never proves two records describe the same film.
    MovieId
);

id_type!(
    /// Identifier of a watched-list row.
    WatchedId
);

id_type!(
    /// Identifier of a watchlist row.
    WatchlistId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_serde_as_plain_numbers() {
        let id = MovieId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: MovieId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_matches_raw_value() {
        assert_eq!(UserId::new(7).to_string(), "7");
    }
}
