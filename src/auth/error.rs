use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::password::HashError;
use crate::auth::repo_types::PersistenceError;

pub const UNAUTHENTICATED: &str = "Unauthenticated";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Failures of the account operations.
///
/// Everything except [`AuthError::Unauthenticated`] is reported as a 500 with
/// the error text in `error`, constraint messages included.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Single login failure shape, whatever the underlying cause.
    #[error("Invalid email or password")]
    Unauthenticated,
}

pub type AuthResult<T> = Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": UNAUTHENTICATED,
                    "message": INVALID_CREDENTIALS,
                })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
