//! ExecutionClient for streamed task execution.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde_json::json;

use crate::stream::{ExecutionSession, TransportError, WireFormat};

/// Client for the `/api/execute-task` endpoint
#[derive(Debug, Clone)]
pub struct ExecutionClient {
    base_url: String,
    http: reqwest::Client,
    format: WireFormat,
}

impl ExecutionClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8080`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            format: WireFormat::NdjsonV1,
        })
    }

    /// Request the given wire format (NDJSON v1 by default)
    pub fn with_format(mut self, format: WireFormat) -> Self {
        self.format = format;
        self
    }

    /// Start executing a task. Request failures yield an already failed
    /// session rather than an error, so callers handle one outcome type.
    pub async fn execute(&self, title: &str, description: &str) -> ExecutionSession {
        let url = format!("{}/api/execute-task", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(ACCEPT, self.format.content_type())
            .json(&json!({ "taskTitle": title, "taskDescription": description }))
            .send()
            .await;

        let mut response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Execute request failed");
                return ExecutionSession::failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, %status, "Execute request rejected");
            return ExecutionSession::failed(format!("HTTP {status}: {body}"));
        }

        let chunks = async_stream::stream! {
            loop {
                match response.chunk().await {
                    Ok(Some(bytes)) => yield Ok(bytes.to_vec()),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(TransportError(e.to_string()));
                        break;
                    }
                }
            }
        };
        ExecutionSession::new(Box::pin(chunks))
    }
}
