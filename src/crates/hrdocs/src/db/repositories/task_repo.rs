//! Task repository for database operations

use std::collections::HashMap;

use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{timestamp_now, Document, NewDocument, NewTask, Task, TaskWithDocuments};
use crate::db::repositories::DocumentRepository;
use crate::TaskStatus;

/// Task repository for managing task database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Create a new task in `todo`
    pub async fn create(pool: &DatabasePool, new_task: &NewTask) -> DbResult<Task> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp_now();

        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, title, description, type, status, priority, recipient_email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&id)
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.task_type.as_str())
        .bind(TaskStatus::Todo.as_str())
        .bind(new_task.priority.as_str())
        .bind(&new_task.recipient_email)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Get a task by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// All tasks, newest first
    pub async fn list(pool: &DatabasePool) -> DbResult<Vec<Task>> {
        let tasks =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at DESC, rowid DESC")
                .fetch_all(pool)
                .await?;

        Ok(tasks)
    }

    /// All tasks, newest first, each with its documents
    pub async fn list_with_documents(pool: &DatabasePool) -> DbResult<Vec<TaskWithDocuments>> {
        let tasks = Self::list(pool).await?;

        let mut by_task: HashMap<String, Vec<Document>> = HashMap::new();
        for document in DocumentRepository::list_all(pool).await? {
            by_task
                .entry(document.task_id.clone())
                .or_default()
                .push(document);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let documents = by_task.remove(&task.id).unwrap_or_default();
                task.with_documents(documents)
            })
            .collect())
    }

    /// One task with its documents
    pub async fn get_with_documents(
        pool: &DatabasePool,
        id: &str,
    ) -> DbResult<Option<TaskWithDocuments>> {
        let Some(task) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };
        let documents = DocumentRepository::list_by_task(pool, id).await?;
        Ok(Some(task.with_documents(documents)))
    }

    /// Set a task's status
    ///
    /// # Returns
    /// The updated task, or `None` when no row matched `id`
    pub async fn update_status(
        pool: &DatabasePool,
        id: &str,
        status: TaskStatus,
    ) -> DbResult<Option<Task>> {
        Self::set_status(pool, id, status).await
    }

    async fn set_status<'e, E>(executor: E, id: &str, status: TaskStatus) -> DbResult<Option<Task>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(status.as_str())
        .bind(timestamp_now())
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    /// Mark a task `completed` and insert its document in one transaction
    ///
    /// Either both writes land or neither does, so a document never exists for
    /// a task that is not completed.
    pub async fn complete_with_document(
        pool: &DatabasePool,
        new_document: &NewDocument,
    ) -> DbResult<(Task, Document)> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionError(e.to_string()))?;

        let task = Self::set_status(&mut *tx, &new_document.task_id, TaskStatus::Completed)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("task {}", new_document.task_id)))?;

        let document = DocumentRepository::insert(&mut *tx, new_document).await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionError(e.to_string()))?;

        Ok((task, document))
    }

    /// Delete a task and, by cascade, its documents
    ///
    /// # Returns
    /// Whether a row was deleted
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count total tasks
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;
    use crate::{DocumentType, TaskPriority};

    async fn setup() -> DatabaseConnection {
        let db = DatabaseConnection::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    fn offer_letter() -> NewTask {
        NewTask {
            title: "Q3 Offer Letter".to_string(),
            description: "Senior Engineer, start Oct 1, $150k".to_string(),
            task_type: DocumentType::OfferLetter,
            priority: TaskPriority::High,
            recipient_email: None,
        }
    }

    fn document_for(task_id: &str) -> NewDocument {
        NewDocument {
            task_id: task_id.to_string(),
            title: "Offer".to_string(),
            content: "Dear candidate".to_string(),
            doc_type: "offer_letter".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_task() {
        let db = setup().await;
        let task = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();

        assert_eq!(task.title, "Q3 Offer Letter");
        assert_eq!(task.status, "todo");
        assert_eq!(task.priority, "high");
        assert_eq!(task.task_type, "offer_letter");
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup().await;
        let created = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();

        let fetched = TaskRepository::get_by_id(db.pool(), &created.id).await.unwrap();
        assert_eq!(fetched, Some(created));

        let missing = TaskRepository::get_by_id(db.pool(), "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = setup().await;
        let first = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();
        let second = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();

        let ids: Vec<_> = TaskRepository::list(db.pool())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_status_reports_missing_row() {
        let db = setup().await;
        let task = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();

        let updated = TaskRepository::update_status(db.pool(), &task.id, TaskStatus::InProgress)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, "in_progress");

        let missing = TaskRepository::update_status(db.pool(), "nope", TaskStatus::Completed)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_complete_with_document_is_atomic() {
        let db = setup().await;
        let task = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();

        let (completed, document) =
            TaskRepository::complete_with_document(db.pool(), &document_for(&task.id))
                .await
                .unwrap();
        assert_eq!(completed.status, "completed");
        assert_eq!(document.task_id, task.id);

        // Unknown task: nothing written
        let err = TaskRepository::complete_with_document(db.pool(), &document_for("ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(DocumentRepository::count_by_task(db.pool(), "ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_documents() {
        let db = setup().await;
        let task = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();
        for _ in 0..3 {
            TaskRepository::complete_with_document(db.pool(), &document_for(&task.id))
                .await
                .unwrap();
        }
        assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 3);

        assert!(TaskRepository::delete(db.pool(), &task.id).await.unwrap());
        assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 0);
        assert_eq!(TaskRepository::count(db.pool()).await.unwrap(), 0);

        assert!(!TaskRepository::delete(db.pool(), &task.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_with_documents_groups_by_task() {
        let db = setup().await;
        let with_doc = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();
        let without_doc = TaskRepository::create(db.pool(), &offer_letter()).await.unwrap();
        TaskRepository::complete_with_document(db.pool(), &document_for(&with_doc.id))
            .await
            .unwrap();

        let listed = TaskRepository::list_with_documents(db.pool()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].task.id, without_doc.id);
        assert!(listed[0].documents.is_empty());
        assert_eq!(listed[1].documents.len(), 1);

        let single = TaskRepository::get_with_documents(db.pool(), &with_doc.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(single.documents.len(), 1);
        assert_eq!(single.task.status, "completed");
    }
}
