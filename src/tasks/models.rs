// Task data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::ownership::OwnedResource;

/// Task database model
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for Task {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Task response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    #[schema(example = "Complete project documentation")]
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
            owner_id: task.owner_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Task creation request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Complete project documentation")]
    pub title: String,
    #[schema(example = "Write comprehensive API documentation")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Task update request DTO
/// All fields are optional to support partial updates
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// Query parameters for listing tasks
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct TaskListQuery {
    /// Number of records to skip
    #[validate(range(min = 0))]
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of records to return (1-100, default 100)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    /// Filter by completion status
    pub completed: Option<bool>,
}

impl TaskListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100)
    }
}
