//! Authentication and authorization error taxonomy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::store::StoreError;

/// Every failure the auth core can produce. The set is closed so callers
/// branch on the variant, never on the message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User with this email already exists")]
    DuplicateCredential,
    #[error("Password must be at least {min_length} characters long")]
    WeakCredential { min_length: usize },
    #[error("Password must be at most {max_bytes} bytes long")]
    OversizedCredential { max_bytes: usize },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Identity is missing a user id or email")]
    InvalidIdentity,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    ExpiredToken,
    #[error("Invalid authorization format. Use: Bearer <token>")]
    InvalidAuthFormat,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateCredential
            | AuthError::WeakCredential { .. }
            | AuthError::OversizedCredential { .. }
            | AuthError::InvalidIdentity
            | AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InvalidAuthFormat
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            AuthError::Store(StoreError::Conflict) => StatusCode::BAD_REQUEST,
            AuthError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Internal(_) | AuthError::Store(StoreError::Backend(_)) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}
