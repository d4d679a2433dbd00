// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::auth::token::TokenError;

/// Error type for authentication operations.
///
/// Every bearer-credential failure (missing header, malformed token, bad
/// signature, expired token, wrong token type, unknown subject) maps to the
/// same 401 response body so a caller cannot tell which check failed.
/// Registration conflicts deliberately name the offending field.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token is not an access token")]
    WrongTokenType,

    #[error("token subject does not resolve to a user")]
    UnknownSubject,

    #[error("inactive user")]
    InactiveAccount,

    #[error("invalid refresh token")]
    InvalidRefreshToken,

    #[error("email already registered")]
    EmailTaken,

    #[error("username already taken")]
    UsernameTaken,

    #[error("password hashing failed")]
    PasswordHash,

    #[error("token creation failed: {0}")]
    TokenCreation(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::Validation(errors.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::InvalidCredentials => {
                warn!("Login attempt with invalid credentials");
                (
                    StatusCode::UNAUTHORIZED,
                    "Incorrect email or password".to_string(),
                )
            }
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::WrongTokenType
            | AuthError::UnknownSubject => {
                warn!("Rejected bearer credential: {}", self);
                (
                    StatusCode::UNAUTHORIZED,
                    "Could not validate credentials".to_string(),
                )
            }
            AuthError::InactiveAccount => (StatusCode::BAD_REQUEST, "Inactive user".to_string()),
            AuthError::InvalidRefreshToken => {
                warn!("Rejected refresh token");
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid refresh token".to_string(),
                )
            }
            AuthError::EmailTaken => (
                StatusCode::BAD_REQUEST,
                "Email already registered".to_string(),
            ),
            AuthError::UsernameTaken => {
                (StatusCode::BAD_REQUEST, "Username already taken".to_string())
            }
            AuthError::PasswordHash | AuthError::TokenCreation(_) | AuthError::Database(_) => {
                error!("Internal error in auth: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
