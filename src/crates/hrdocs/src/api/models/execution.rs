//! Execute-task request

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::require_text;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteTaskRequest {
    #[serde(rename = "taskTitle", alias = "task_title")]
    pub task_title: Option<String>,
    #[serde(rename = "taskDescription", alias = "task_description")]
    pub task_description: Option<String>,
}

impl ExecuteTaskRequest {
    /// Title and description, both required
    pub fn into_parts(self) -> ApiResult<(String, String)> {
        Ok((
            require_text(self.task_title, "taskTitle")?,
            require_text(self.task_description, "taskDescription")?,
        ))
    }
}
