//! Shared fixtures: in-memory database and scripted collaborators.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hrdocs::api::AppState;
use hrdocs::breakdown::BreakdownPlanner;
use hrdocs::config::PromptTemplates;
use hrdocs::db::{DatabaseConnection, NewTask, Task, TaskRepository};
use hrdocs::execution::TaskExecutionService;
use hrdocs::generation::LlmDocumentWriter;
use hrdocs::notify::{EmailMessage, NotificationDispatcher, NotifyError};
use hrdocs::{DocumentOrchestrator, DocumentType, TaskPriority};
use llm::{LlmError, OutputSchema, StreamingModel, StructuredModel, TextStream};
use serde_json::Value;

pub async fn test_db() -> DatabaseConnection {
    let db = DatabaseConnection::in_memory().await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

pub async fn create_task(
    db: &DatabaseConnection,
    title: &str,
    kind: DocumentType,
    recipient: Option<&str>,
) -> Task {
    TaskRepository::create(
        db.pool(),
        &NewTask {
            title: title.to_string(),
            description: format!("{title} details"),
            task_type: kind,
            priority: TaskPriority::High,
            recipient_email: recipient.map(str::to_string),
        },
    )
    .await
    .unwrap()
}

/// Model whose replies are queued up front
#[derive(Default)]
pub struct ScriptedModel {
    objects: Mutex<VecDeque<llm::Result<Value>>>,
    streams: Mutex<VecDeque<llm::Result<Vec<llm::Result<String>>>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_object(&self, reply: llm::Result<Value>) {
        self.objects.lock().unwrap().push_back(reply);
    }

    pub fn push_stream(&self, script: llm::Result<Vec<llm::Result<String>>>) {
        self.streams.lock().unwrap().push_back(script);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredModel for ScriptedModel {
    async fn generate_object(&self, _schema: &OutputSchema, prompt: &str) -> llm::Result<Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.objects
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::ProviderError("no scripted reply".into())))
    }
}

#[async_trait]
impl StreamingModel for ScriptedModel {
    async fn stream_text(&self, prompt: &str) -> llm::Result<TextStream> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let script = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::ProviderError("no scripted stream".into())))?;
        Ok(Box::pin(futures::stream::iter(script)))
    }
}

/// Dispatcher that records every message and answers with a fixed result
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<EmailMessage>>,
    reply: Result<bool, NotifyError>,
}

impl RecordingNotifier {
    pub fn delivering() -> Arc<Self> {
        Self::replying(Ok(true))
    }

    pub fn replying(reply: Result<bool, NotifyError>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn dispatch(&self, message: &EmailMessage) -> Result<bool, NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        self.reply.clone()
    }
}

pub fn orchestrator(
    db: &DatabaseConnection,
    model: Arc<ScriptedModel>,
    notifier: Arc<RecordingNotifier>,
) -> DocumentOrchestrator {
    let prompts = Arc::new(PromptTemplates::default());
    DocumentOrchestrator::new(
        db.clone(),
        Arc::new(LlmDocumentWriter::new(model, prompts)),
        notifier,
    )
}

pub fn app_state(
    db: &DatabaseConnection,
    model: Arc<ScriptedModel>,
    notifier: Arc<RecordingNotifier>,
) -> AppState {
    let prompts = Arc::new(PromptTemplates::default());
    AppState {
        db: db.clone(),
        orchestrator: orchestrator(db, model.clone(), notifier),
        executor: Arc::new(TaskExecutionService::new(model.clone(), prompts.clone())),
        planner: Arc::new(BreakdownPlanner::new(model, prompts)),
    }
}
