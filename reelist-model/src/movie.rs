//! Locally cached catalog records.

use crate::ids::MovieId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of fixed genre slots on a catalog row.
pub const GENRE_SLOTS: usize = 10;

/// Fixed-width genre representation: up to [`GENRE_SLOTS`] upstream genre
/// codes, absent slots explicitly `None` rather than omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreSlots(pub [Option<i32>; GENRE_SLOTS]);

impl GenreSlots {
    /// Slot the first [`GENRE_SLOTS`] genre codes; extras are dropped.
    pub fn from_codes(codes: &[i32]) -> Self {
        let mut slots = [None; GENRE_SLOTS];
        for (slot, code) in slots.iter_mut().zip(codes.iter()) {
            *slot = Some(*code);
        }
        Self(slots)
    }

    /// The occupied slots, in order.
    pub fn codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().filter_map(|slot| *slot)
    }
}

/// A movie record cached from the external catalog provider.
///
/// The row is keyed by the provider's own identifier, which is not guaranteed
/// stable; the cache reconciler may delete and re-create a row when it
/// detects the identifier was reassigned to a different title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogEntry {
    pub movie_id: MovieId,
    pub title: String,
    /// Runtime in minutes; `0` is the "unknown/unreleased" sentinel, distinct
    /// from a missing record.
    pub runtime_minutes: i32,
    pub certification: Option<String>,
    pub language: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
    pub adult: bool,
    pub overview: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub genres: GenreColumns,
    pub refreshed_at: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }

    pub fn genre_slots(&self) -> GenreSlots {
        self.genres.as_slots()
    }
}

/// Flat genre columns as stored (`genre_01` .. `genre_10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct GenreColumns {
    pub genre_01: Option<i32>,
    pub genre_02: Option<i32>,
    pub genre_03: Option<i32>,
    pub genre_04: Option<i32>,
    pub genre_05: Option<i32>,
    pub genre_06: Option<i32>,
    pub genre_07: Option<i32>,
    pub genre_08: Option<i32>,
    pub genre_09: Option<i32>,
    pub genre_10: Option<i32>,
}

impl GenreColumns {
    pub fn as_slots(&self) -> GenreSlots {
        GenreSlots([
            self.genre_01,
            self.genre_02,
            self.genre_03,
            self.genre_04,
            self.genre_05,
            self.genre_06,
            self.genre_07,
            self.genre_08,
            self.genre_09,
            self.genre_10,
        ])
    }
}

impl From<GenreSlots> for GenreColumns {
    fn from(slots: GenreSlots) -> Self {
        let [g1, g2, g3, g4, g5, g6, g7, g8, g9, g10] = slots.0;
        Self {
            genre_01: g1,
            genre_02: g2,
            genre_03: g3,
            genre_04: g4,
            genre_05: g5,
            genre_06: g6,
            genre_07: g7,
            genre_08: g8,
            genre_09: g9,
            genre_10: g10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_slots_truncate_and_pad() {
        let slots = GenreSlots::from_codes(&[28, 12, 878]);
        assert_eq!(slots.codes().collect::<Vec<_>>(), vec![28, 12, 878]);
        assert_eq!(slots.0[3], None);

        let overfull: Vec<i32> = (1..=12).collect();
        let slots = GenreSlots::from_codes(&overfull);
        assert_eq!(slots.codes().count(), GENRE_SLOTS);
        assert_eq!(slots.0[GENRE_SLOTS - 1], Some(10));
    }

    #[test]
    fn genre_columns_round_trip() {
        let slots = GenreSlots::from_codes(&[18, 53]);
        let columns = GenreColumns::from(slots);
        assert_eq!(columns.genre_01, Some(18));
        assert_eq!(columns.genre_03, None);
        assert_eq!(columns.as_slots(), slots);
    }
}
