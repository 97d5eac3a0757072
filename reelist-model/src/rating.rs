//! User rating of a watched movie.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// A rating between 0.0 and 10.0, stored with one decimal of precision.
///
/// Construction validates the range and rounds to one decimal so `7.55` and
/// `7.5` compare equal once stored.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Rating(f32);

impl Rating {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 10.0;

    pub fn new(value: f32) -> Result<Self, ModelError> {
        if !value.is_finite() {
            return Err(ModelError::RatingNotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ModelError::RatingOutOfRange(value));
        }
        Ok(Self((value * 10.0).round() / 10.0))
    }

    pub const fn value(&self) -> f32 {
        self.0
    }

    /// Whether this is a perfect 10.0 ("ten star") rating.
    pub fn is_perfect(&self) -> bool {
        self.0 == Self::MAX
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl TryFrom<f32> for Rating {
    type Error = ModelError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Rating::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Rating::new(10.0).unwrap().value(), 10.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(Rating::new(7.55).unwrap().value(), 7.6);
        assert_eq!(Rating::new(7.54).unwrap().value(), 7.5);
        assert_eq!(Rating::new(7.5).unwrap().to_string(), "7.5");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Rating::new(10.1),
            Err(ModelError::RatingOutOfRange(_))
        ));
        assert!(matches!(
            Rating::new(-0.1),
            Err(ModelError::RatingOutOfRange(_))
        ));
        assert!(matches!(
            Rating::new(f32::NAN),
            Err(ModelError::RatingNotFinite)
        ));
    }

    #[test]
    fn perfect_rating_detection() {
        assert!(Rating::new(10.0).unwrap().is_perfect());
        assert!(!Rating::new(9.9).unwrap().is_perfect());
    }
}
