//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": "..."}` JSON bodies with the matching
//! status code. Causes of 500s are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;

pub const NOT_FOUND_MESSAGE: &str = "Data not found";
pub const INVALID_ID_MESSAGE: &str = "Invalid id";
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Path id is not an integer (400)
    InvalidId { raw: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidId { raw } => {
                tracing::debug!(id = %raw, "rejected non-integer id");
                (StatusCode::BAD_REQUEST, INVALID_ID_MESSAGE)
            }
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, id = %id, "not found");
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_id_is_400() {
        let err = ApiError::InvalidId {
            raw: "1 OR 1=1".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid id"}));
    }

    #[tokio::test]
    async fn not_found_is_404_with_fixed_body() {
        let err = ApiError::from(DbError::NotFound {
            resource: "result",
            id: "42".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Data not found"}));
    }

    #[tokio::test]
    async fn database_error_is_generic_500() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::RowNotFound));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, json!({"error": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn database_error_hides_detail() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::Protocol(
            "Table 'speedtest.results' doesn't exist".into(),
        )));
        let bytes = to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("speedtest.results"), "{text}");
    }
}
