use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

/// Failure taxonomy for the rules components. Every variant is a typed,
/// recoverable outcome; the boundary collapses each to a bare status with
/// an empty body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("username is already taken")]
    DuplicateUsername,
    #[error("account {0} does not exist")]
    UnknownAuthor(i64),
    /// The reason is diagnostic only; every login failure looks the same to
    /// the client.
    #[error("login rejected: {0}")]
    Unauthorized(&'static str),
    #[error("message {0} does not exist")]
    MessageNotFound(i64),
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUsername => StatusCode::CONFLICT,
            ApiError::UnknownAuthor(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Updating a missing message is reported as a bad request, not
            // a 404 — absence is only a normal outcome for get and delete.
            ApiError::MessageNotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self);
        } else {
            debug!("request rejected: {}", self);
        }

        status.into_response()
    }
}
