//! Lifecycle error types

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Upstream model failure, schema mismatch, missing template or timeout
    #[error("Upstream generation error: {0}")]
    GenerationFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl LifecycleError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LifecycleError::NotFound(_))
    }
}

impl From<DatabaseError> for LifecycleError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => LifecycleError::NotFound(what),
            other => LifecycleError::PersistenceFailed(other.to_string()),
        }
    }
}

impl From<llm::LlmError> for LifecycleError {
    fn from(err: llm::LlmError) -> Self {
        LifecycleError::GenerationFailed(err.to_string())
    }
}
