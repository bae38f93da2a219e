//! Ollama HTTP client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::prompt::{fix_prompt, generation_prompt};
use super::{CommandGenerator, GenerationError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

/// Client for a local Ollama server's non-streaming `/api/generate` endpoint.
///
/// Requests have no timeout.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().build().map_err(GenerationError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.model, "POST {}", url);
        trace!("Prompt:\n{}", prompt);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(GenerationError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(GenerationError::Request)?;
        debug!("Ollama responded with {} ({} bytes)", status, body.len());

        if status != StatusCode::OK {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateResponse =
            serde_json::from_str(&body).map_err(GenerationError::Decode)?;

        if let Some(error) = decoded.error.filter(|e| !e.is_empty()) {
            return Err(GenerationError::Api(error));
        }

        Ok(decoded.response.trim().to_string())
    }
}

#[async_trait]
impl CommandGenerator for OllamaClient {
    async fn generate(
        &self,
        system_prompt: &str,
        query: &str,
        env_context: &str,
    ) -> Result<String, GenerationError> {
        self.complete(&generation_prompt(system_prompt, query, env_context))
            .await
    }

    async fn fix(
        &self,
        original_query: &str,
        failed_command: &str,
        failure_output: &str,
    ) -> Result<String, GenerationError> {
        self.complete(&fix_prompt(original_query, failed_command, failure_output))
            .await
    }
}
