use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use reelist_core::CoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => Self::not_found(msg),
            CoreError::Conflict(msg) => Self::conflict(msg),
            CoreError::UpstreamUnavailable(msg) => {
                Self::bad_gateway(format!("catalog provider unavailable: {msg}"))
            }
            CoreError::Validation(msg) => Self::bad_request(msg),
            CoreError::Database(err) => {
                // Storage detail stays out of the response body.
                error!(error = %err, "database error");
                Self::internal("internal storage error")
            }
        }
    }
}

impl From<reelist_core::providers::ProviderError> for AppError {
    fn from(err: reelist_core::providers::ProviderError) -> Self {
        use reelist_core::providers::ProviderError;
        match err {
            ProviderError::NotFound => Self::not_found("movie not found upstream"),
            other => {
                Self::bad_gateway(format!("catalog provider unavailable: {other}"))
            }
        }
    }
}

impl From<reelist_model::ModelError> for AppError {
    fn from(err: reelist_model::ModelError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let cases = [
            (
                CoreError::not_found("watched entry"),
                StatusCode::NOT_FOUND,
            ),
            (
                CoreError::conflict("movie already marked watched"),
                StatusCode::CONFLICT,
            ),
            (
                CoreError::UpstreamUnavailable("timed out".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CoreError::Validation("rating out of range".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn database_errors_hide_detail() {
        let app = AppError::from(CoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(app.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!app.message.contains("pool"));
    }

    #[test]
    fn rating_validation_maps_to_bad_request() {
        let err = reelist_model::Rating::new(11.0).unwrap_err();
        assert_eq!(AppError::from(err).status, StatusCode::BAD_REQUEST);
    }
}
