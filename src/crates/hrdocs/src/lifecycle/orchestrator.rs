//! Document orchestrator

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::db::{
    DatabaseConnection, Document, DocumentRepository, Task, TaskRepository, TaskWithDocuments,
};
use crate::generation::{DocumentRequest, DocumentWriter, GeneratedDocument};
use crate::lifecycle::{GenerationSaga, LifecycleError};
use crate::notify::{EmailMessage, NotificationDispatcher};

/// Result of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// The task after completion, with every document it owns
    pub task: TaskWithDocuments,
    /// The document created by this run
    pub document: Document,
}

/// Runs document generation for tasks
#[derive(Clone)]
pub struct DocumentOrchestrator {
    db: DatabaseConnection,
    writer: Arc<dyn DocumentWriter>,
    notifier: Arc<dyn NotificationDispatcher>,
    generation_timeout: Option<Duration>,
}

impl DocumentOrchestrator {
    pub fn new(
        db: DatabaseConnection,
        writer: Arc<dyn DocumentWriter>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            db,
            writer,
            notifier,
            generation_timeout: None,
        }
    }

    /// Bound each generation call; elapsed time counts as a generation failure
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Generate, persist and announce one document for `task_id`.
    ///
    /// On success the task is `completed` and owns exactly one new document.
    /// On any generation or persistence failure the task's status is restored
    /// and no document is written. Email delivery never affects the result.
    pub async fn generate_document_for_task(
        &self,
        task_id: &str,
    ) -> Result<GenerationOutcome, LifecycleError> {
        let pool = self.db.pool();

        let task = TaskRepository::get_by_id(pool, task_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(task_id.to_string()))?;
        let kind = task
            .document_type()
            .map_err(|e| LifecycleError::ValidationError(e.to_string()))?;

        let saga = GenerationSaga::begin(pool, task).await?;

        let request = DocumentRequest {
            kind,
            description: &saga.task().description,
            context: None,
        };
        let generated = match self.generate(request).await {
            Ok(generated) => generated,
            Err(err) => {
                saga.compensate(&err).await;
                return Err(err);
            }
        };

        let task_title = saga.task().title.clone();
        let recipient = saga.task().recipient().map(str::to_string);
        let (committed, document) = saga.commit(&generated).await?;

        if let Some(to) = recipient {
            self.notify(&to, &task_title, &document).await;
        }

        let task = self.reload(committed, &document).await;
        Ok(GenerationOutcome { task, document })
    }

    /// Re-read the task with its documents once the commit is durable. A failed
    /// read is logged and answered from the committed rows instead.
    async fn reload(&self, committed: Task, document: &Document) -> TaskWithDocuments {
        let pool = self.db.pool();
        match TaskRepository::get_with_documents(pool, &committed.id).await {
            Ok(Some(task)) => return task,
            Ok(None) => {
                tracing::warn!(task_id = %committed.id, "Task vanished after commit, returning committed state")
            }
            Err(e) => {
                tracing::warn!(task_id = %committed.id, error = %e, "Reload after commit failed, returning committed state")
            }
        }

        let documents = match DocumentRepository::list_by_task(pool, &committed.id).await {
            Ok(documents) if documents.iter().any(|d| d.id == document.id) => documents,
            Ok(_) => vec![document.clone()],
            Err(e) => {
                tracing::warn!(task_id = %committed.id, error = %e, "Document list after commit failed");
                vec![document.clone()]
            }
        };

        TaskWithDocuments {
            task: committed,
            documents,
        }
    }

    async fn generate(
        &self,
        request: DocumentRequest<'_>,
    ) -> Result<GeneratedDocument, LifecycleError> {
        let call = self.writer.write(request);
        let result = match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                LifecycleError::GenerationFailed(format!(
                    "document generation timed out after {}s",
                    limit.as_secs_f64()
                ))
            })?,
            None => call.await,
        };

        let generated = result?;
        tracing::info!(kind = %request.kind, title = %generated.title, "Document generated");
        Ok(generated)
    }

    async fn notify(&self, to: &str, task_title: &str, document: &Document) {
        let message = EmailMessage::document_ready(to, task_title, &document.title, &document.content);
        match self.notifier.dispatch(&message).await {
            Ok(true) => tracing::info!(task_id = %document.task_id, to = %to, "Document email sent"),
            Ok(false) => {
                tracing::warn!(task_id = %document.task_id, to = %to, "Document email not delivered")
            }
            Err(e) => {
                tracing::warn!(task_id = %document.task_id, to = %to, error = %e, "Document email rejected")
            }
        }
    }
}
