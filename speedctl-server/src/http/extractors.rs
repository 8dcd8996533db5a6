//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;

/// Extract and validate a result id from the path.
///
/// Only a plain integer gets through; anything else is a 400 before a
/// connection is ever checked out.
pub struct ResultId(pub i64);

impl<S> FromRequestParts<S> for ResultId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidId { raw: e.body_text() })?;

        parse_id(&raw).map(Self)
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidId { raw: raw.to_string() })
}
