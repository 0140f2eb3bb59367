//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use camguard_domain::error::{CamGuardError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Maps [`CamGuardError`] to an HTTP response with appropriate status code.
pub struct ApiError(CamGuardError);

impl From<CamGuardError> for ApiError {
    fn from(err: CamGuardError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            CamGuardError::Validation(err @ ValidationError::ImageTooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", err.to_string())
            }
            CamGuardError::Validation(err @ ValidationError::UnsupportedMediaType(_)) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                err.to_string(),
            ),
            CamGuardError::Validation(err) => {
                (StatusCode::BAD_REQUEST, "validation_error", err.to_string())
            }
            CamGuardError::NotFound(err) => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
            CamGuardError::Storage(err) => {
                tracing::error!(error = %err, details = ?err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}
