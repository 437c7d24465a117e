use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure conditions surfaced to callers. Each variant turns into a client
/// error status with its reason string as the plain-text body; storage
/// failures are logged server-side and answered with an opaque 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no user with provided username")]
    NotFound,
    #[error("already in friend list")]
    AlreadyFriends,
    #[error("already in friend list")]
    DuplicateRequest,
    #[error("the user with provided username did not send a friend request to you")]
    NoSuchRequest,
    #[error("user with username is not in your friend list")]
    NotFriends,
    #[error("username already taken")]
    UsernameTaken,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Store(err) = &self {
            tracing::error!(error = %err, "storage failure");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response();
        }
        (self.status(), self.to_string()).into_response()
    }
}
