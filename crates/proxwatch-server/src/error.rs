//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies all request failure modes into a single enum that
//! converts into an Axum response with a `{"error": "..."}` body via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! failure is the client's: server-side problems never reach a handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use proxwatch_core::ValidationError;
use proxwatch_types::ErrorBody;

/// Errors that can occur while handling an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The reading's `distance` failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body is not JSON.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl ApiError {
    /// HTTP status this error maps to.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };

        (self.status_code(), axum::Json(body)).into_response()
    }
}
