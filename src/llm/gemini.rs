// file: src/llm/gemini.rs
// description: Gemini API integration for single-shot text generation
// reference: https://ai.google.dev/api/generate-content

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ModelConfig};
use crate::error::{ModelError, Result as PipelineResult, SummarizeError};
use crate::llm::ModelClient;
use crate::llm::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    timeout: Duration,
}

fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!("Falling back to an HTTP client without timeout: {}", e);
        Client::new()
    })
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            client: http_client(timeout),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.3,
            timeout,
        }
    }

    /// Builds a client from configuration. Fails with a configuration error
    /// when no credential is set, before any request is made.
    pub fn from_config(config: &ModelConfig) -> PipelineResult<Self> {
        let api_key = config.credential()?.to_string();
        let timeout = Duration::from_secs(config.timeout_secs.max(1));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizeError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            timeout,
        })
    }

    /// Replaces the HTTP client with one using the given request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        let model = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    fn status_error(status: StatusCode, body: &str) -> ModelError {
        let detail = serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(|e| e.message())
            .unwrap_or_else(|| body.trim().to_string());
        let detail = if detail.is_empty() {
            status.to_string()
        } else {
            format!("{} ({})", detail, status)
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Authentication(detail),
            StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimit(detail),
            _ => ModelError::Model(detail),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::Authentication("API key is empty".to_string()));
        }

        let request = GenerateContentRequest::user_text(prompt, self.temperature);

        debug!(
            "Requesting generation from {} for {} chars",
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Transport(format!("failed to send Gemini request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelError::Transport(format!("failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            warn!("Gemini request failed with status {}", status);
            return Err(Self::status_error(status, &body));
        }

        let generated: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ModelError::Model(format!("failed to parse Gemini response: {}", e)))?;

        if let Some(reason) = generated.block_reason() {
            return Err(ModelError::Model(format!("prompt blocked: {}", reason)));
        }

        match generated.primary_text() {
            Some(text) => {
                debug!("Received {} chars", text.chars().count());
                Ok(text)
            }
            None => Err(ModelError::Model(format!(
                "no text returned (finish reason: {})",
                generated.finish_reason().unwrap_or("unknown")
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
