use thiserror::Error;

/// Validation failures raised while constructing model types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("rating {0} is outside the 0.0-10.0 range")]
    RatingOutOfRange(f32),

    #[error("rating is not a finite number")]
    RatingNotFinite,
}
