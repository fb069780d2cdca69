//! Task execution service

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use llm::{LlmError, StreamingModel, TextStream};

use crate::config::PromptTemplates;
use crate::stream::{Frame, WireFormat};

/// Encoded response lines; an `Err` aborts the response body
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, std::io::Error>> + Send>>;

pub struct TaskExecutionService {
    model: Arc<dyn StreamingModel>,
    prompts: Arc<PromptTemplates>,
}

impl TaskExecutionService {
    pub fn new(model: Arc<dyn StreamingModel>, prompts: Arc<PromptTemplates>) -> Self {
        Self { model, prompts }
    }

    /// Start executing a task.
    ///
    /// Waits for the first delta so that a failure before any output is
    /// returned as `Err` rather than inside the stream.
    pub async fn execute(&self, title: &str, description: &str) -> Result<TextStream, LlmError> {
        let prompt = self.prompts.execution_prompt(title, description);
        tracing::info!(task_title = %title, "Starting task execution");

        let mut deltas = self.model.stream_text(&prompt).await?;
        let first = match deltas.next().await {
            Some(Ok(delta)) => Some(delta),
            Some(Err(e)) => return Err(e),
            None => None,
        };

        Ok(Box::pin(futures::stream::iter(first.map(Ok)).chain(deltas)))
    }
}

/// Frame each delta, then a finish frame.
///
/// An upstream error mid-stream is sent as an error frame and then ends the
/// body with an `Err`, so the reader sees a failed transfer.
pub fn encode_frames(mut deltas: TextStream, format: WireFormat) -> FrameStream {
    Box::pin(async_stream::stream! {
        let mut sent = 0usize;
        while let Some(item) = deltas.next().await {
            match item {
                Ok(delta) => {
                    if delta.is_empty() {
                        continue;
                    }
                    if let Some(line) = Frame::Text(delta).encode(format) {
                        sent += 1;
                        yield Ok(line);
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, frames = sent, "Execution stream failed");
                    if let Some(line) = Frame::Error(e.to_string()).encode(format) {
                        yield Ok(line);
                    }
                    yield Err(std::io::Error::other(e.to_string()));
                    return;
                }
            }
        }
        tracing::info!(frames = sent, "Execution stream finished");
        if let Some(line) = Frame::Finish("stop".to_string()).encode(format) {
            yield Ok(line);
        }
    })
}
