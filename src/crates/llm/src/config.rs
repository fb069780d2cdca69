//! Configuration for remote generation providers.

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for an OpenAI-compatible remote provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    ///
    /// Examples:
    /// - OpenAI: "https://api.openai.com/v1"
    /// - OpenRouter: "https://openrouter.ai/api/v1"
    /// - LM Studio: "http://localhost:1234/v1"
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Sampling temperature, provider default when unset.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl RemoteLlmConfig {
    /// Create a new remote LLM configuration.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: default_timeout(),
            temperature: None,
        }
    }

    /// Create configuration with the API key read from an environment variable.
    pub fn from_env(
        env_var: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = std::env::var(env_var)
            .map_err(|_| LlmError::ApiKeyNotFound(format!("Environment variable: {}", env_var)))?;

        Ok(Self::new(api_key, base_url, model))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Endpoint URL for chat completions, tolerant of a trailing slash.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = RemoteLlmConfig::new("key", "https://api.openai.com/v1/", "gpt-4o-mini")
            .with_timeout(Duration::from_secs(5))
            .with_temperature(0.7);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(
            config.chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_env_missing() {
        let result = RemoteLlmConfig::from_env(
            "HRDOCS_TEST_SURELY_UNSET_KEY",
            "https://api.openai.com/v1",
            "gpt-4o-mini",
        );
        assert!(matches!(result, Err(LlmError::ApiKeyNotFound(_))));
    }
}
