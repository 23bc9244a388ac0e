//! HTTP error mapping.
//!
//! Store errors carry the failure taxonomy; this module is the single place
//! where each variant becomes a status code and an [`ErrorResponse`] body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use store::StoreError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Shape(#[from] validator::ValidationErrors),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Shape(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),
            ApiError::Store(err) => match err {
                StoreError::Validation(message) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
                }
                StoreError::Authentication(message) => {
                    (StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR", message)
                }
                StoreError::Authorization(message) => {
                    (StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR", message)
                }
                StoreError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                StoreError::Conflict(message) => (StatusCode::CONFLICT, "CONFLICT", message),
                StoreError::Internal(message) => {
                    error!("Internal error: {}", message);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "internal server error".to_string(),
                    )
                }
                StoreError::Database(db_err) => {
                    error!("Database error: {}", db_err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DATABASE_ERROR",
                        "internal server error".to_string(),
                    )
                }
            },
        };

        if status.is_client_error() {
            warn!("Request failed with {}: {}", status, message);
        }

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
