//! Structured document generation
//!
//! Turns a task's kind and description into a `{title, content}` pair by way
//! of a [`StructuredModel`]. The orchestrator only sees the [`DocumentWriter`]
//! trait, so tests can script it directly.

use std::sync::Arc;

use async_trait::async_trait;
use llm::{generate_as, LlmError, OutputSchema, StructuredModel};
use serde::{Deserialize, Serialize};

use crate::config::PromptTemplates;
use crate::DocumentType;

/// Model output for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub title: String,
    /// Markdown body
    pub content: String,
}

/// Request for one document
#[derive(Debug, Clone, Copy)]
pub struct DocumentRequest<'a> {
    pub kind: DocumentType,
    pub description: &'a str,
    pub context: Option<&'a str>,
}

/// Produces document text for a task
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    async fn write(&self, request: DocumentRequest<'_>) -> Result<GeneratedDocument, LlmError>;
}

/// Schema every generated document must match
pub fn document_schema() -> OutputSchema {
    OutputSchema::new("hr_document")
        .string("title", "A clear, professional title for the document")
        .string("content", "The complete document content in markdown format")
}

/// [`DocumentWriter`] backed by a structured model and the configured prompts
pub struct LlmDocumentWriter {
    model: Arc<dyn StructuredModel>,
    prompts: Arc<PromptTemplates>,
    schema: OutputSchema,
}

impl LlmDocumentWriter {
    pub fn new(model: Arc<dyn StructuredModel>, prompts: Arc<PromptTemplates>) -> Self {
        Self {
            model,
            prompts,
            schema: document_schema(),
        }
    }
}

#[async_trait]
impl DocumentWriter for LlmDocumentWriter {
    async fn write(&self, request: DocumentRequest<'_>) -> Result<GeneratedDocument, LlmError> {
        let prompt = self
            .prompts
            .document_prompt(request.kind, request.description, request.context)
            .ok_or_else(|| {
                LlmError::ConfigError(format!("No prompt template for {}", request.kind))
            })?;

        tracing::debug!(kind = %request.kind, prompt_len = prompt.len(), "Generating document");
        generate_as(self.model.as_ref(), &self.schema, &prompt).await
    }
}
