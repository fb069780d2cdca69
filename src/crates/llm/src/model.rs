//! Provider-agnostic generation traits.

use crate::error::{LlmError, Result};
use crate::schema::OutputSchema;
use async_trait::async_trait;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::pin::Pin;

/// Single-pass stream of text deltas, finite, not restartable.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Request/response generation constrained to an [`OutputSchema`].
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Generate a JSON object for `prompt` that should match `schema`.
    ///
    /// Implementations return the raw object; [`generate_as`] validates it.
    async fn generate_object(&self, schema: &OutputSchema, prompt: &str) -> Result<Value>;
}

/// Generation whose output arrives incrementally.
#[async_trait]
pub trait StreamingModel: Send + Sync {
    /// Open a stream for `prompt`. Errors before the first delta are returned
    /// here; later failures surface as `Err` items on the stream.
    async fn stream_text(&self, prompt: &str) -> Result<TextStream>;
}

/// Generate, validate against `schema`, and deserialize into `T`.
pub async fn generate_as<T: DeserializeOwned>(
    model: &dyn StructuredModel,
    schema: &OutputSchema,
    prompt: &str,
) -> Result<T> {
    let value = model.generate_object(schema, prompt).await?;
    schema.validate(&value)?;
    serde_json::from_value(value).map_err(|e| LlmError::SchemaViolation(e.to_string()))
}
