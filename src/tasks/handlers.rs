// HTTP handlers for task endpoints
// Every id-addressed operation runs through the ownership guard: a task that
// exists but belongs to someone else is reported as missing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::ownership::OwnershipGuard;
use crate::tasks::error::TaskError;
use crate::tasks::models::{CreateTaskRequest, TaskListQuery, TaskResponse, UpdateTaskRequest};
use crate::AppState;

/// List the authenticated user's tasks
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Tasks owned by the caller, newest first", body = Vec<TaskResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<TaskListQuery>,
) -> Result<Json<Vec<TaskResponse>>, TaskError> {
    params.validate()?;

    let tasks = state
        .tasks
        .list_for_owner(user.id, params.completed, params.skip, params.limit())
        .await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Create a new task owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), TaskError> {
    payload.validate()?;

    // The owner is fixed here, from the authenticated identity, and is never
    // reassignable afterwards
    let task = state.tasks.create(user.id, &payload).await?;

    tracing::info!("Created task {} for user {}", task.id, user.id);
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Get one of the caller's tasks by id
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Task missing or owned by another user", body = String, example = json!({"error": "Task not found"}))
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<TaskResponse>, TaskError> {
    let task = OwnershipGuard::authorize_and_scope(&user, state.tasks.find_by_id(id)).await?;

    Ok(Json(task.into()))
}

/// Update one of the caller's tasks (partial update)
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Task missing or owned by another user")
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, TaskError> {
    payload.validate()?;

    let task = OwnershipGuard::authorize_and_scope(&user, state.tasks.find_by_id(id)).await?;
    let updated = state.tasks.update(task.id, &payload).await?;

    tracing::info!("Updated task {} for user {}", updated.id, user.id);
    Ok(Json(updated.into()))
}

/// Delete one of the caller's tasks
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Task missing or owned by another user")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, TaskError> {
    let task = OwnershipGuard::authorize_and_scope(&user, state.tasks.find_by_id(id)).await?;
    state.tasks.delete(task.id).await?;

    tracing::info!("Deleted task {} for user {}", task.id, user.id);
    Ok(StatusCode::NO_CONTENT)
}
