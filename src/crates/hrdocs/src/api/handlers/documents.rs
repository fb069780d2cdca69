//! Document generation handler

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::{error::ApiResult, response, routes::AppState};

/// POST /api/tasks/:id/generate
///
/// Returns `{task, document}`. On failure the task is back in its prior status.
pub async fn generate_document(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(task_id = %id, "Generating document");
    let outcome = app_state.orchestrator.generate_document_for_task(&id).await?;
    Ok(response::ok(outcome))
}
