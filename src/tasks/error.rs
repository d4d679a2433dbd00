use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::auth::ownership::NotOwned;

/// Error types for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for TaskError {
    fn from(err: sqlx::Error) -> Self {
        TaskError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for TaskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        TaskError::ValidationError(errors.to_string())
    }
}

// An ownership denial renders exactly like a missing task, so other users
// cannot probe which ids exist
impl From<NotOwned> for TaskError {
    fn from(_: NotOwned) -> Self {
        TaskError::NotFound
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            TaskError::NotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            TaskError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            TaskError::DatabaseError(msg) => {
                error!("Database error in tasks: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
