//! Generation saga
//!
//! `begin` writes `in_progress`; exactly one of `commit` or `compensate`
//! follows, and both consume the saga. Each step is logged with the task id.

use crate::db::{DatabasePool, Document, NewDocument, Task, TaskRepository};
use crate::generation::GeneratedDocument;
use crate::lifecycle::LifecycleError;
use crate::TaskStatus;

/// Recorded saga step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    Begun,
    Committed,
    Compensated,
    CompensationFailed,
}

impl SagaStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStep::Begun => "begun",
            SagaStep::Committed => "committed",
            SagaStep::Compensated => "compensated",
            SagaStep::CompensationFailed => "compensation_failed",
        }
    }
}

/// One in-flight generation for a task
#[derive(Debug)]
#[must_use = "a begun saga must be committed or compensated"]
pub struct GenerationSaga<'a> {
    pool: &'a DatabasePool,
    task: Task,
    /// Status restored on compensation
    rollback_to: TaskStatus,
    steps: Vec<SagaStep>,
}

impl<'a> GenerationSaga<'a> {
    /// Persist `in_progress` before any generation work starts.
    pub async fn begin(pool: &'a DatabasePool, task: Task) -> Result<Self, LifecycleError> {
        let prior = task
            .status()
            .map_err(|e| LifecycleError::ValidationError(e.to_string()))?;
        if !prior.can_advance_to(TaskStatus::InProgress) {
            return Err(LifecycleError::ValidationError(format!(
                "task {} cannot move from {} to in_progress",
                task.id, prior
            )));
        }

        let task = TaskRepository::update_status(pool, &task.id, TaskStatus::InProgress)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(task.id.clone()))?;

        // Rollback never reverts a completed task.
        let rollback_to = match prior {
            TaskStatus::Completed => TaskStatus::Completed,
            _ => TaskStatus::Todo,
        };

        tracing::info!(task_id = %task.id, step = "begin", from = %prior, "Generation saga started");

        Ok(Self {
            pool,
            task,
            rollback_to,
            steps: vec![SagaStep::Begun],
        })
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn steps(&self) -> &[SagaStep] {
        &self.steps
    }

    /// Write `completed` and the document atomically.
    ///
    /// A failed commit leaves nothing behind; the saga compensates before
    /// returning the error.
    pub async fn commit(
        mut self,
        generated: &GeneratedDocument,
    ) -> Result<(Task, Document), LifecycleError> {
        let new_document = NewDocument {
            task_id: self.task.id.clone(),
            title: generated.title.clone(),
            content: generated.content.clone(),
            doc_type: self.task.task_type.clone(),
        };

        match TaskRepository::complete_with_document(self.pool, &new_document).await {
            Ok((task, document)) => {
                self.steps.push(SagaStep::Committed);
                tracing::info!(
                    task_id = %task.id,
                    document_id = %document.id,
                    step = "commit",
                    "Generation saga committed"
                );
                Ok((task, document))
            }
            Err(e) => {
                let err = LifecycleError::from(e);
                self.compensate(&err).await;
                Err(err)
            }
        }
    }

    /// Restore the pre-generation status. Runs once; a failure here is logged
    /// and the caller still reports the original error.
    pub async fn compensate(mut self, cause: &LifecycleError) -> Vec<SagaStep> {
        let result = TaskRepository::update_status(self.pool, &self.task.id, self.rollback_to).await;
        match result {
            Ok(Some(_)) => {
                self.steps.push(SagaStep::Compensated);
                tracing::warn!(
                    task_id = %self.task.id,
                    step = "compensate",
                    to = %self.rollback_to,
                    cause = %cause,
                    "Generation saga compensated"
                );
            }
            Ok(None) => {
                self.steps.push(SagaStep::CompensationFailed);
                tracing::error!(
                    task_id = %self.task.id,
                    step = "compensate",
                    cause = %cause,
                    "Task no longer exists, nothing to restore"
                );
            }
            Err(e) => {
                self.steps.push(SagaStep::CompensationFailed);
                tracing::error!(
                    task_id = %self.task.id,
                    step = "compensate",
                    cause = %cause,
                    error = %e,
                    "Compensating status write failed"
                );
            }
        }
        self.steps
    }
}
