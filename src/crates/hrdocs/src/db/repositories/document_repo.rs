//! Document repository
//!
//! Documents are insert-only. There is no update and no direct delete; rows
//! disappear only through the cascade from their task.

use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::{timestamp_now, Document, NewDocument};

pub struct DocumentRepository;

impl DocumentRepository {
    /// Insert a document on any executor (pool or open transaction)
    pub async fn insert<'e, E>(executor: E, new_document: &NewDocument) -> DbResult<Document>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, task_id, title, content, type, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&new_document.task_id)
        .bind(&new_document.title)
        .bind(&new_document.content)
        .bind(&new_document.doc_type)
        .bind(timestamp_now())
        .fetch_one(executor)
        .await?;

        Ok(document)
    }

    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(document)
    }

    /// Documents of one task in generation order
    pub async fn list_by_task(pool: &DatabasePool, task_id: &str) -> DbResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE task_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    pub async fn list_all(pool: &DatabasePool) -> DbResult<Vec<Document>> {
        let documents =
            sqlx::query_as::<_, Document>("SELECT * FROM documents ORDER BY created_at ASC, rowid ASC")
                .fetch_all(pool)
                .await?;

        Ok(documents)
    }

    pub async fn count_by_task(pool: &DatabasePool, task_id: &str) -> DbResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE task_id = ?")
            .bind(task_id)
            .fetch_one(pool)
            .await?;

        Ok(result.0)
    }
}
