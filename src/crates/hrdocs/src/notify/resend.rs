//! Resend-compatible HTTP dispatcher

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::notify::{EmailMessage, NotificationDispatcher, NotifyError};

/// Posts messages to a Resend-style `/emails` endpoint
#[derive(Debug, Clone)]
pub struct ResendDispatcher {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendDispatcher {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }

    fn payload(&self, message: &EmailMessage) -> serde_json::Value {
        json!({
            "from": self.from,
            "to": [message.to.trim()],
            "subject": message.subject,
            "html": message.render_html(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for ResendDispatcher {
    async fn dispatch(&self, message: &EmailMessage) -> Result<bool, NotifyError> {
        message.validate()?;

        let response = match self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(message))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(to = %message.to, error = %e, "Email request failed");
                return Ok(false);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(to = %message.to, %status, body = %body, "Email provider rejected message");
            return Ok(false);
        }

        let id = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("id").and_then(|id| id.as_str()).map(str::to_string));
        tracing::info!(to = %message.to, id = ?id, "Email sent");
        Ok(true)
    }
}
