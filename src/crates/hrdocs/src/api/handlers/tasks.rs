//! Task endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

use crate::api::{
    error::{ApiError, ApiResult},
    models::{CreateTaskRequest, UpdateTaskStatusRequest},
    response,
    routes::AppState,
};
use crate::db::TaskRepository;

/// GET /api/tasks
///
/// All tasks with their documents, newest first.
pub async fn list_tasks(State(app_state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tasks = TaskRepository::list_with_documents(app_state.db.pool()).await?;
    Ok(response::ok(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let new_task = req.into_new_task()?;

    let created = TaskRepository::create(app_state.db.pool(), &new_task).await?;

    tracing::info!(task_id = %created.id, kind = %created.task_type, "Created task");
    Ok(response::created(created.with_documents(Vec::new())))
}

/// PATCH /api/tasks/:id
pub async fn update_task_status(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskStatusRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let status = req.status()?;
    let pool = app_state.db.pool();

    TaskRepository::update_status(pool, &id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("task {id}")))?;

    let task = TaskRepository::get_with_documents(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("task {id}")))?;

    tracing::info!(task_id = %id, status = %status, "Updated task status");
    Ok(response::ok(task))
}

/// DELETE /api/tasks/:id
///
/// Documents go with the task. Deleting an unknown id still succeeds.
pub async fn delete_task(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = TaskRepository::delete(app_state.db.pool(), &id).await?;
    tracing::info!(task_id = %id, deleted, "Deleted task");
    Ok(response::success())
}
