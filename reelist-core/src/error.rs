use thiserror::Error;

/// Errors surfaced by the core engine.
///
/// Every variant maps to one outcome at the action boundary: a failed action
/// has no partial effects. Multi-statement transitions roll back entirely on
/// any `Database` error.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("catalog provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }
}

impl From<reelist_model::ModelError> for CoreError {
    fn from(err: reelist_model::ModelError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
