// Task storage: trait seam plus the PostgreSQL implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tasks::error::TaskError;
use crate::tasks::models::{CreateTaskRequest, Task, UpdateTaskRequest};

/// Storage abstraction for task records.
///
/// Lookups are deliberately not owner-scoped: every protected operation
/// fetches the row and runs it through the ownership guard, so a miss and a
/// foreign row fail identically at the handler boundary.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, owner_id: Uuid, task: &CreateTaskRequest) -> Result<Task, TaskError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError>;

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        completed: Option<bool>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, TaskError>;

    /// Apply a partial update; fields left `None` keep their stored values.
    async fn update(&self, id: Uuid, changes: &UpdateTaskRequest) -> Result<Task, TaskError>;

    async fn delete(&self, id: Uuid) -> Result<(), TaskError>;
}

const TASK_COLUMNS: &str =
    "id, title, description, is_completed, owner_id, created_at, updated_at";

/// PostgreSQL-backed task repository
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Create a new PgTaskRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskRepository {
    async fn create(&self, owner_id: Uuid, task: &CreateTaskRequest) -> Result<Task, TaskError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, is_completed, owner_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TASK_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_completed)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        completed: Option<bool>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, TaskError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE owner_id = $1 AND ($2::boolean IS NULL OR is_completed = $2) \
             ORDER BY created_at DESC OFFSET $3 LIMIT $4"
        ))
        .bind(owner_id)
        .bind(completed)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update(&self, id: Uuid, changes: &UpdateTaskRequest) -> Result<Task, TaskError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 is_completed = COALESCE($4, is_completed), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.is_completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TaskError::NotFound)?;

        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<(), TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound);
        }

        Ok(())
    }
}
