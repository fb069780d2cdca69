//! Task API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{require_text, validate_string_length};
use crate::db::NewTask;
use crate::{DocumentType, TaskPriority, TaskStatus};

/// Request to create a new task
///
/// Every field is optional at the parsing level so that a missing field is a
/// validation error, not a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Document kind, e.g. `offer_letter`
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    /// `low`, `medium` (default) or `high`
    pub priority: Option<String>,
    pub recipient_email: Option<String>,
}

impl CreateTaskRequest {
    /// Validate and convert into an insertable task
    pub fn into_new_task(self) -> ApiResult<NewTask> {
        let title = require_text(self.title, "title")?;
        validate_string_length(&title, "title", 1, 255)?;
        let description = require_text(self.description, "description")?;
        let task_type: DocumentType = require_text(self.task_type, "type")?
            .parse()
            .map_err(|e: crate::ParseKindError| ApiError::ValidationError(e.to_string()))?;
        let priority = match self.priority.as_deref() {
            None | Some("") => TaskPriority::default(),
            Some(value) => value
                .parse()
                .map_err(|e: crate::ParseKindError| ApiError::ValidationError(e.to_string()))?,
        };
        let recipient_email = self
            .recipient_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        Ok(NewTask {
            title,
            description,
            task_type,
            priority,
            recipient_email,
        })
    }
}

/// Request to move a task to another status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: Option<String>,
}

impl UpdateTaskStatusRequest {
    pub fn status(&self) -> ApiResult<TaskStatus> {
        let status = self
            .status
            .as_deref()
            .ok_or_else(|| ApiError::ValidationError("status is required".to_string()))?;
        status
            .parse()
            .map_err(|e: crate::ParseKindError| ApiError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateTaskRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Q3 Offer Letter",
            "description": "Senior Engineer, start Oct 1, $150k",
            "type": "offer_letter",
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_defaults() {
        let task = request().into_new_task().unwrap();
        assert_eq!(task.task_type, DocumentType::OfferLetter);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.recipient_email.is_none());
    }

    #[test]
    fn test_create_request_rejects_missing_and_unknown() {
        let mut missing = request();
        missing.description = None;
        assert!(matches!(missing.into_new_task(), Err(ApiError::ValidationError(_))));

        let mut unknown = request();
        unknown.task_type = Some("memo".into());
        let err = unknown.into_new_task().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Unknown document type: memo");

        let mut bad_priority = request();
        bad_priority.priority = Some("urgent".into());
        assert!(bad_priority.into_new_task().is_err());
    }

    #[test]
    fn test_blank_recipient_is_dropped() {
        let mut req = request();
        req.recipient_email = Some("  ".into());
        assert!(req.into_new_task().unwrap().recipient_email.is_none());
    }

    #[test]
    fn test_update_status_request() {
        let req = UpdateTaskStatusRequest {
            status: Some("in_progress".into()),
        };
        assert_eq!(req.status().unwrap(), TaskStatus::InProgress);
        assert!(UpdateTaskStatusRequest { status: Some("done".into()) }.status().is_err());
        assert!(UpdateTaskStatusRequest::default().status().is_err());
    }
}
