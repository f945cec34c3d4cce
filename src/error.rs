use axum::Json;
use axum::extract::FromRequestParts;
use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use tracing::error;

use crate::auth::password::PasswordError;
use crate::schemas::ErrorResponse;

/// Failure taxonomy for the API surface. Every variant converts straight
/// into an HTTP response with a flat `{"error": ...}` body; clients never
/// see store internals, those go to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable bearer token in the request.
    #[error("Unauthorized")]
    Unauthorized,
    /// Token present but rejected; the reason is appended for the client.
    #[error("Unauthorized: {0}")]
    InvalidToken(String),
    /// Authenticated, but role or ownership does not allow the operation.
    #[error("Forbidden")]
    Forbidden,
    /// Record addressed by id does not exist. Holds the resource name.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Client-caused malformed write.
    #[error("Invalid request")]
    InvalidRequest,
    /// Path id that does not parse as an integer.
    #[error("Invalid id")]
    InvalidId,
    /// Unexpected store failure.
    #[error("Server error")]
    Internal(#[from] DbErr),
    /// Password hashing failed on our side.
    #[error("Server error")]
    Hashing(#[from] PasswordError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest | ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::Internal(source) => error!("Store failure surfaced as 500: {}", source),
            ApiError::Hashing(source) => error!("Hashing failure surfaced as 500: {}", source),
            _ => {}
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::InvalidId
    }
}

/// Path extractor whose failure is a structured 400 instead of the
/// framework's plain-text rejection, so malformed ids get the same
/// `{"error": ...}` body as every other failure.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct IdPath(pub i32);
