//! Streamed task execution handler

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::{error::ApiResult, models::ExecuteTaskRequest, routes::AppState};
use crate::execution::encode_frames;
use crate::stream::WireFormat;

/// POST /api/execute-task
///
/// Streams the execution as legacy `0:"..."` lines, or NDJSON v1 frames when
/// the request accepts `application/x-ndjson`. An upstream failure before any
/// output is a 500; later failures end the body with an error frame.
pub async fn execute_task(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ExecuteTaskRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    let (title, description) = req.into_parts()?;

    let format = WireFormat::from_accept(
        headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok()),
    );

    let deltas = app_state.executor.execute(&title, &description).await?;
    let body = Body::from_stream(encode_frames(deltas, format));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type()),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}
