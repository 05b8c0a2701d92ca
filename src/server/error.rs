//! Request-scoped API errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::task::JoinError;

use crate::error_handling::CheckerError;

/// Error answered to API callers as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl From<CheckerError> for ApiError {
    fn from(e: CheckerError) -> Self {
        match e {
            CheckerError::EmptySubject | CheckerError::InvalidInput(_) => {
                ApiError::BadRequest(e.to_string())
            }
            CheckerError::Dataset(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Internal(format!("Checker task failed: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => {
                log::error!("{}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
