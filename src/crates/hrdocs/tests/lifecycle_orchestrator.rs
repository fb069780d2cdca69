//! Document generation lifecycle against a real in-memory store

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::{create_task, orchestrator, test_db, RecordingNotifier, ScriptedModel};
use hrdocs::db::{DatabaseConnection, DocumentRepository, TaskRepository};
use hrdocs::config::PromptTemplates;
use hrdocs::generation::{DocumentRequest, DocumentWriter, GeneratedDocument, LlmDocumentWriter};
use hrdocs::notify::{EmailMessage, NotificationDispatcher, NotifyError};
use hrdocs::{DocumentOrchestrator, DocumentType, LifecycleError};
use llm::LlmError;
use serde_json::json;

fn offer_reply() -> serde_json::Value {
    json!({
        "title": "Offer Letter - Senior Engineer",
        "content": "Dear candidate,\n\nWe are pleased to offer you the role."
    })
}

async fn status_of(db: &DatabaseConnection, id: &str) -> String {
    TaskRepository::get_by_id(db.pool(), id)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn test_generation_completes_task_without_recipient() {
    let db = test_db().await;
    let task = create_task(&db, "Q3 Offer Letter", DocumentType::OfferLetter, None).await;
    let model = ScriptedModel::new();
    model.push_object(Ok(offer_reply()));
    let notifier = RecordingNotifier::delivering();

    let outcome = orchestrator(&db, model.clone(), notifier.clone())
        .generate_document_for_task(&task.id)
        .await
        .unwrap();

    assert_eq!(outcome.task.task.status, "completed");
    assert_eq!(outcome.task.documents.len(), 1);
    assert_eq!(outcome.document.title, "Offer Letter - Senior Engineer");
    assert_eq!(outcome.document.doc_type, "offer_letter");
    assert_eq!(outcome.document.task_id, task.id);
    assert!(notifier.sent().is_empty());

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Q3 Offer Letter details"));
}

#[tokio::test]
async fn test_generation_failure_rolls_back_to_todo() {
    let db = test_db().await;
    let task = create_task(
        &db,
        "Q3 Offer Letter",
        DocumentType::OfferLetter,
        Some("hr@example.com"),
    )
    .await;
    let model = ScriptedModel::new();
    model.push_object(Err(LlmError::ProviderError("model unavailable".into())));
    let notifier = RecordingNotifier::delivering();

    let err = orchestrator(&db, model, notifier.clone())
        .generate_document_for_task(&task.id)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::GenerationFailed(_)));
    assert_eq!(status_of(&db, &task.id).await, "todo");
    assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_schema_violation_is_a_generation_failure() {
    let db = test_db().await;
    let task = create_task(&db, "Handbook", DocumentType::Policy, None).await;
    let model = ScriptedModel::new();
    model.push_object(Ok(json!({ "title": "Remote Work Policy" })));

    let err = orchestrator(&db, model, RecordingNotifier::delivering())
        .generate_document_for_task(&task.id)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::GenerationFailed(_)));
    assert_eq!(status_of(&db, &task.id).await, "todo");
}

#[tokio::test]
async fn test_recipient_receives_one_email() {
    let db = test_db().await;
    let task = create_task(
        &db,
        "Q3 Offer Letter",
        DocumentType::OfferLetter,
        Some("hr@example.com"),
    )
    .await;
    let model = ScriptedModel::new();
    model.push_object(Ok(offer_reply()));
    let notifier = RecordingNotifier::delivering();

    orchestrator(&db, model, notifier.clone())
        .generate_document_for_task(&task.id)
        .await
        .unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "hr@example.com");
    assert_eq!(sent[0].subject, "HR Document Ready: Offer Letter - Senior Engineer");
    assert_eq!(sent[0].task_title, "Q3 Offer Letter");
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_generation() {
    for reply in [
        Ok(false),
        Err(NotifyError::InvalidRecipient("hr@".to_string())),
    ] {
        let db = test_db().await;
        let task = create_task(&db, "Welcome", DocumentType::OnboardingEmail, Some("hr@")).await;
        let model = ScriptedModel::new();
        model.push_object(Ok(offer_reply()));
        let notifier = RecordingNotifier::replying(reply);

        let outcome = orchestrator(&db, model, notifier.clone())
            .generate_document_for_task(&task.id)
            .await
            .unwrap();

        assert_eq!(outcome.task.task.status, "completed");
        assert_eq!(notifier.sent().len(), 1);
    }
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let db = test_db().await;
    let model = ScriptedModel::new();

    let err = orchestrator(&db, model.clone(), RecordingNotifier::delivering())
        .generate_document_for_task("missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn test_regeneration_accumulates_documents() {
    let db = test_db().await;
    let task = create_task(&db, "Backend JD", DocumentType::JobDescription, None).await;
    let model = ScriptedModel::new();
    model.push_object(Ok(json!({ "title": "JD v1", "content": "first" })));
    model.push_object(Ok(json!({ "title": "JD v2", "content": "second" })));
    model.push_object(Err(LlmError::Timeout("deadline exceeded".into())));
    let orchestrator = orchestrator(&db, model, RecordingNotifier::delivering());

    orchestrator.generate_document_for_task(&task.id).await.unwrap();
    let second = orchestrator.generate_document_for_task(&task.id).await.unwrap();
    let titles: Vec<_> = second.task.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["JD v1", "JD v2"]);

    // A failed rerun restores the task's earlier completed state
    orchestrator.generate_document_for_task(&task.id).await.unwrap_err();
    assert_eq!(status_of(&db, &task.id).await, "completed");
    assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 2);
}

/// Writer that sleeps well past any test timeout
struct SlowWriter;

#[async_trait]
impl DocumentWriter for SlowWriter {
    async fn write(&self, _request: DocumentRequest<'_>) -> Result<GeneratedDocument, LlmError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(GeneratedDocument {
            title: "late".to_string(),
            content: "late".to_string(),
        })
    }
}

#[tokio::test]
async fn test_generation_timeout_rolls_back() {
    let db = test_db().await;
    let task = create_task(&db, "Exit", DocumentType::TerminationLetter, None).await;
    let orchestrator = DocumentOrchestrator::new(
        db.clone(),
        Arc::new(SlowWriter),
        RecordingNotifier::delivering(),
    )
    .with_generation_timeout(Some(Duration::from_millis(50)));

    let err = orchestrator
        .generate_document_for_task(&task.id)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::GenerationFailed(_)));
    assert_eq!(status_of(&db, &task.id).await, "todo");
    assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 0);
}

/// Writer that records the task status visible while it runs
struct ObservingWriter {
    db: DatabaseConnection,
    task_id: String,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentWriter for ObservingWriter {
    async fn write(&self, _request: DocumentRequest<'_>) -> Result<GeneratedDocument, LlmError> {
        let task = TaskRepository::get_by_id(self.db.pool(), &self.task_id)
            .await
            .unwrap()
            .unwrap();
        self.seen.lock().unwrap().push(task.status);
        Ok(GeneratedDocument {
            title: "Review".to_string(),
            content: "Meets expectations".to_string(),
        })
    }
}

#[tokio::test]
async fn test_task_is_in_progress_while_generating() {
    let db = test_db().await;
    let task = create_task(&db, "H1 review", DocumentType::PerformanceReview, None).await;
    let writer = Arc::new(ObservingWriter {
        db: db.clone(),
        task_id: task.id.clone(),
        seen: Mutex::new(Vec::new()),
    });
    let orchestrator =
        DocumentOrchestrator::new(db.clone(), writer.clone(), RecordingNotifier::delivering());

    orchestrator.generate_document_for_task(&task.id).await.unwrap();

    assert_eq!(*writer.seen.lock().unwrap(), vec!["in_progress".to_string()]);
    assert_eq!(status_of(&db, &task.id).await, "completed");
}

/// Writer that runs one statement against the store before answering
struct MeddlingWriter {
    db: DatabaseConnection,
    statement: String,
}

#[async_trait]
impl DocumentWriter for MeddlingWriter {
    async fn write(&self, _request: DocumentRequest<'_>) -> Result<GeneratedDocument, LlmError> {
        sqlx::query(&self.statement)
            .execute(self.db.pool())
            .await
            .unwrap();
        Ok(GeneratedDocument {
            title: "Offer".to_string(),
            content: "Dear candidate".to_string(),
        })
    }
}

fn meddling(db: &DatabaseConnection, statement: impl Into<String>) -> DocumentOrchestrator {
    let writer = Arc::new(MeddlingWriter {
        db: db.clone(),
        statement: statement.into(),
    });
    DocumentOrchestrator::new(db.clone(), writer, RecordingNotifier::delivering())
}

#[tokio::test]
async fn test_rejected_document_insert_rolls_back_commit() {
    let db = test_db().await;
    let task = create_task(&db, "Q4 Offer", DocumentType::OfferLetter, None).await;
    let orchestrator = meddling(
        &db,
        "CREATE TRIGGER reject_documents BEFORE INSERT ON documents \
         BEGIN SELECT RAISE(ABORT, 'documents are frozen'); END",
    );

    let err = orchestrator
        .generate_document_for_task(&task.id)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::PersistenceFailed(_)), "{err:?}");
    assert_eq!(status_of(&db, &task.id).await, "todo");
    assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_task_deleted_during_generation_is_not_found() {
    let db = test_db().await;
    let task = create_task(&db, "Q4 Offer", DocumentType::OfferLetter, None).await;
    let orchestrator = meddling(&db, format!("DELETE FROM tasks WHERE id = '{}'", task.id));

    let err = orchestrator
        .generate_document_for_task(&task.id)
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "{err:?}");
    assert!(TaskRepository::get_by_id(db.pool(), &task.id).await.unwrap().is_none());
    assert_eq!(DocumentRepository::count_by_task(db.pool(), &task.id).await.unwrap(), 0);
}

/// Dispatcher that deletes the task it is told about, then reports delivery
struct DeletingNotifier {
    db: DatabaseConnection,
    task_id: String,
}

#[async_trait]
impl NotificationDispatcher for DeletingNotifier {
    async fn dispatch(&self, _message: &EmailMessage) -> Result<bool, NotifyError> {
        TaskRepository::delete(self.db.pool(), &self.task_id)
            .await
            .unwrap();
        Ok(true)
    }
}

#[tokio::test]
async fn test_outcome_survives_task_removed_after_commit() {
    let db = test_db().await;
    let task = create_task(
        &db,
        "Q4 Offer",
        DocumentType::OfferLetter,
        Some("candidate@example.com"),
    )
    .await;
    let model = ScriptedModel::new();
    model.push_object(Ok(offer_reply()));
    let prompts = Arc::new(PromptTemplates::default());
    let orchestrator = DocumentOrchestrator::new(
        db.clone(),
        Arc::new(LlmDocumentWriter::new(model, prompts)),
        Arc::new(DeletingNotifier {
            db: db.clone(),
            task_id: task.id.clone(),
        }),
    );

    let outcome = orchestrator
        .generate_document_for_task(&task.id)
        .await
        .unwrap();

    assert_eq!(outcome.task.task.id, task.id);
    assert_eq!(outcome.task.task.status, "completed");
    assert_eq!(outcome.task.documents, vec![outcome.document.clone()]);
    assert!(TaskRepository::get_by_id(db.pool(), &task.id).await.unwrap().is_none());
}
