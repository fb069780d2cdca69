//! Goal breakdown handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

use crate::api::{
    error::ApiResult,
    models::{GenerateTasksRequest, GenerateTasksResponse},
    response,
    routes::AppState,
};

/// POST /api/generate-tasks
pub async fn generate_tasks(
    State(app_state): State<AppState>,
    payload: Result<Json<GenerateTasksRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let goal = req.goal()?;

    let tasks = app_state.planner.generate_breakdown(goal).await?;
    Ok(response::ok(GenerateTasksResponse { tasks }))
}
