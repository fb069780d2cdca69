//! Goal breakdown request and response

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::breakdown::SuggestedTask;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateTasksRequest {
    /// Kept untyped so a non-string goal is reported as a validation error
    pub goal: Option<Value>,
}

impl GenerateTasksRequest {
    pub fn goal(&self) -> ApiResult<&str> {
        match &self.goal {
            Some(Value::String(goal)) if !goal.trim().is_empty() => Ok(goal.as_str()),
            _ => Err(ApiError::ValidationError("Goal is required".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTasksResponse {
    pub tasks: Vec<SuggestedTask>,
}
