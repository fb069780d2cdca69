//! Document model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A generated artifact, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: String,

    /// Owning task; rows go away with it (ON DELETE CASCADE)
    pub task_id: String,

    pub title: String,

    /// Full document body (markdown)
    pub content: String,

    /// Mirrors the owning task's type
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub doc_type: String,

    pub created_at: String,
}

/// Fields of a document about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub task_id: String,
    pub title: String,
    pub content: String,
    pub doc_type: String,
}
