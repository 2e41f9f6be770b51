//! Model generation seam and its HTTP implementation.
//!
//! The pipeline talks to the model through [`ModelClient`] so tests can
//! substitute a mock. [`HttpModelClient`] speaks the Ollama generate API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PipelineConfig;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("cannot reach model server at {url}")]
    Connection { url: String },

    #[error("model request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("model server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Parse(String),
}

/// Per-request generation knobs, seeded from [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl From<&PipelineConfig> for GenerationOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for a local Ollama-compatible model server.
pub struct HttpModelClient {
    client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl HttpModelClient {
    const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn with_timeout(base_url: &str, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
        }
    }

    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else if err.is_connect() {
            GenerationError::Connection {
                url: self.base_url.clone(),
            }
        } else {
            GenerationError::Parse(err.to_string())
        }
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %options.model, prompt_chars = prompt.len(), "sending generate request");

        let request = GenerateRequest {
            model: &options.model,
            prompt,
            system,
            stream: false,
            options: ModelOptions {
                temperature: options.temperature,
                num_predict: options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    #[test]
    fn options_come_from_config() {
        let config = PipelineConfig::default();
        let options = GenerationOptions::from(&config);
        assert_eq!(options.model, config.model);
        assert_eq!(options.temperature, config.temperature);
        assert_eq!(options.max_output_tokens, config.max_output_tokens);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpModelClient::new("http://localhost:11434/");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn errors_render_usable_messages() {
        let err = GenerationError::Http {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));

        let err = GenerationError::Timeout { seconds: 120 };
        assert!(err.to_string().contains("120"));
    }
}
