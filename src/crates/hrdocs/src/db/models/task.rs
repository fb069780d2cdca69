//! Task model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::models::Document;
use crate::{DocumentType, ParseKindError, TaskPriority, TaskStatus};

/// One unit of HR-document work
///
/// Enum-valued columns are kept as strings, the way they are stored; use the
/// typed accessors to read them. The table's CHECK constraints keep `status`
/// and `priority` inside their enumerations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task identifier (UUID string)
    pub id: String,

    pub title: String,

    /// Free-text brief fed to the document prompt
    pub description: String,

    /// Document kind (see [`DocumentType`])
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub task_type: String,

    /// todo, in_progress or completed
    pub status: String,

    /// low, medium or high
    pub priority: String,

    /// Address notified when a document is generated
    pub recipient_email: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl Task {
    pub fn status(&self) -> Result<TaskStatus, ParseKindError> {
        self.status.parse()
    }

    pub fn priority(&self) -> Result<TaskPriority, ParseKindError> {
        self.priority.parse()
    }

    pub fn document_type(&self) -> Result<DocumentType, ParseKindError> {
        self.task_type.parse()
    }

    /// Recipient address, ignoring blank values
    pub fn recipient(&self) -> Option<&str> {
        self.recipient_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Attach the task's documents
    pub fn with_documents(self, documents: Vec<Document>) -> TaskWithDocuments {
        TaskWithDocuments {
            task: self,
            documents,
        }
    }
}

/// Fields of a task about to be inserted; it always starts in `todo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub task_type: DocumentType,
    pub priority: TaskPriority,
    pub recipient_email: Option<String>,
}

/// A task together with every document it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithDocuments {
    #[serde(flatten)]
    pub task: Task,
    pub documents: Vec<Document>,
}
