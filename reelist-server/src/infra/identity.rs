//! Caller identity extraction.
//!
//! The server sits behind an authenticating proxy that injects the caller's
//! numeric id into every request as `x-user-id`. A request without a valid
//! header never reaches a store.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use reelist_model::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted per-request from `x-user-id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub UserId);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::unauthorized("missing x-user-id header"))?
            .to_str()
            .map_err(|_| AppError::unauthorized("malformed x-user-id header"))?;

        let id: i64 = raw
            .parse()
            .map_err(|_| AppError::unauthorized("malformed x-user-id header"))?;
        if id <= 0 {
            return Err(AppError::unauthorized("malformed x-user-id header"));
        }

        Ok(Identity(UserId::new(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(request: Request<()>) -> Result<Identity, AppError> {
        let (mut parts, ()) = request.into_parts();
        Identity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn valid_header_yields_identity() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "42")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap(), Identity(UserId::new(42)));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_numeric_and_non_positive_ids_are_rejected() {
        for raw in ["abc", "0", "-3", "1.5"] {
            let request = Request::builder()
                .header(USER_ID_HEADER, raw)
                .body(())
                .unwrap();
            let err = extract(request).await.unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED, "value {raw:?}");
        }
    }
}
