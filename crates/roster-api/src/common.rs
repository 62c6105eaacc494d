// Shared plumbing for route modules

use axum::http::StatusCode;
use axum::Json;
use roster_contracts::ErrorResponse;
use serde::Deserialize;

/// Error tuple returned by handlers on failure
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn conflict(message: impl Into<String>) -> ApiError {
    (StatusCode::CONFLICT, Json(ErrorResponse::new(message)))
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message)))
}

pub fn unprocessable(message: impl Into<String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::new(message)),
    )
}

pub fn unauthorized(message: impl Into<String>) -> ApiError {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message)))
}

/// 500 with a generic body. Callers log the underlying error at the site.
pub fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
}

/// Offset pagination accepted by all list endpoints
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, 100);

        let p: Pagination = serde_json::from_str(r#"{"skip": 5, "limit": 10}"#).unwrap();
        assert_eq!(p.skip, 5);
        assert_eq!(p.limit, 10);
    }
}
