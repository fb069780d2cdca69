//! OpenAI-compatible chat completions client.
//!
//! Implements both [`StructuredModel`] (JSON-schema constrained responses) and
//! [`StreamingModel`] (server-sent event deltas). Any provider exposing the
//! `/chat/completions` surface works: OpenAI, OpenRouter, LM Studio, vLLM.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{OutputSchema, RemoteLlmConfig, StructuredModel};
//!
//! let config = RemoteLlmConfig::from_env(
//!     "OPENAI_API_KEY",
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//! )?;
//! let client = OpenAiClient::new(config)?;
//!
//! let schema = OutputSchema::new("document")
//!     .string("title", "Document title")
//!     .string("content", "Document body");
//! let object = client.generate_object(&schema, "Write an offer letter").await?;
//! ```

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::model::{StreamingModel, StructuredModel, TextStream};
use crate::schema::OutputSchema;
use crate::sse::{SseDecoder, SseEvent};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Model identifier requests are sent with.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, prompt: &str, response_format: Option<Value>, stream: bool) -> OpenAiRequest {
        OpenAiRequest {
            model: self.config.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: self.config.temperature,
            response_format,
            stream,
        }
    }

    async fn send(&self, body: &OpenAiRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(e.to_string())
                } else {
                    LlmError::HttpError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, error_text));
        }

        Ok(response)
    }

    /// Pull the JSON object out of a completion message.
    ///
    /// Strict schema mode returns bare JSON; some compatible servers still wrap
    /// it in a fenced block, so fall back to the outermost braces.
    fn parse_object(content: &str) -> Result<Value> {
        if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
            return Ok(value);
        }

        let extracted = Self::extract_json(content).ok_or_else(|| {
            LlmError::InvalidResponse("No JSON object found in completion".to_string())
        })?;
        serde_json::from_str(extracted).map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }

    fn extract_json(text: &str) -> Option<&str> {
        if let Some(start) = text.find("```json") {
            let content = &text[start + 7..];
            if let Some(end) = content.find("```") {
                return Some(content[..end].trim());
            }
        }

        let start = text.find('{')?;
        let end = text.rfind('}')?;
        (end > start).then(|| text[start..=end].trim())
    }

    /// Text deltas carried by one streamed chunk, plus whether it finished.
    fn parse_chunk(data: &str) -> Result<(Option<String>, bool)> {
        let chunk: OpenAiStreamChunk = serde_json::from_str(data)?;
        let Some(choice) = chunk.choices.into_iter().next() else {
            return Ok((None, false));
        };
        let text = choice.delta.content.filter(|c| !c.is_empty());
        Ok((text, choice.finish_reason.is_some()))
    }
}

#[async_trait]
impl StructuredModel for OpenAiClient {
    async fn generate_object(&self, schema: &OutputSchema, prompt: &str) -> Result<Value> {
        let response_format = json!({
            "type": "json_schema",
            "json_schema": {
                "name": schema.name,
                "strict": true,
                "schema": schema.to_json_schema(),
            }
        });
        let body = self.build_request(prompt, Some(response_format), false);

        tracing::debug!(model = %self.config.model, schema = %schema.name, "Structured generation request");
        let response = self.send(&body).await?;

        let openai_resp: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = openai_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(LlmError::ProviderError(format!("Model refused: {}", refusal)));
        }

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::InvalidResponse("Completion has no content".to_string()))?;

        Self::parse_object(&content)
    }
}

#[async_trait]
impl StreamingModel for OpenAiClient {
    async fn stream_text(&self, prompt: &str) -> Result<TextStream> {
        let body = self.build_request(prompt, None, true);

        tracing::debug!(model = %self.config.model, "Streaming generation request");
        let mut response = self.send(&body).await?;

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();
            let mut finished = false;

            'read: loop {
                let (events, eof) = match response.chunk().await {
                    Ok(Some(bytes)) => (decoder.push(&bytes), false),
                    Ok(None) => (decoder.finish(), true),
                    Err(e) => {
                        yield Err(LlmError::StreamInterrupted(e.to_string()));
                        return;
                    }
                };

                for event in events {
                    match event {
                        SseEvent::Done => {
                            finished = true;
                            break 'read;
                        }
                        SseEvent::Data(data) => match Self::parse_chunk(&data) {
                            Ok((text, done)) => {
                                finished |= done;
                                if let Some(text) = text {
                                    yield Ok(text);
                                }
                            }
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        },
                    }
                }

                if eof {
                    break;
                }
            }

            if !finished {
                yield Err(LlmError::StreamInterrupted(
                    "Connection closed before the completion finished".to_string(),
                ));
            }
        };

        Ok(Box::pin(stream))
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        let config = RemoteLlmConfig::new("test-key", "https://api.openai.com/v1", "gpt-4o-mini")
            .with_temperature(0.7);
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert_eq!(client().model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let body = client().build_request("hello", None, true);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["stream"], true);
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_parse_object_plain_and_fenced() {
        let plain = OpenAiClient::parse_object(r#"{"title":"A","content":"B"}"#).unwrap();
        assert_eq!(plain["title"], "A");

        let fenced = OpenAiClient::parse_object("Here:\n```json\n{\"title\":\"A\"}\n```").unwrap();
        assert_eq!(fenced["title"], "A");

        assert!(OpenAiClient::parse_object("no json here").is_err());
    }

    #[test]
    fn test_parse_stream_chunk() {
        let (text, done) = OpenAiClient::parse_chunk(
            r#"{"choices":[{"index":0,"delta":{"content":"Step"},"finish_reason":null}]}"#,
        )
        .unwrap();
        assert_eq!(text.as_deref(), Some("Step"));
        assert!(!done);

        let (text, done) =
            OpenAiClient::parse_chunk(r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#)
                .unwrap();
        assert!(text.is_none());
        assert!(done);

        let (text, done) = OpenAiClient::parse_chunk(r#"{"choices":[]}"#).unwrap();
        assert!(text.is_none());
        assert!(!done);
    }
}
