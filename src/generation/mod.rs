//! Generation port: turning requests into command text
//!
//! The repair loop only talks to [`CommandGenerator`]; [`OllamaClient`] is
//! the production implementation.

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;
pub use prompt::{fix_prompt, generation_prompt};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to make request to Ollama: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Ollama API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Ollama API error: {0}")]
    Api(String),
}

/// Source of shell command text.
///
/// Implementations return the raw text; callers strip fences and split it
/// into a batch.
#[async_trait]
pub trait CommandGenerator: Send + Sync {
    /// Produce commands for a user query.
    async fn generate(
        &self,
        system_prompt: &str,
        query: &str,
        env_context: &str,
    ) -> Result<String, GenerationError>;

    /// Produce a corrected command after `failed_command` failed with `failure_output`.
    async fn fix(
        &self,
        original_query: &str,
        failed_command: &str,
        failure_output: &str,
    ) -> Result<String, GenerationError>;
}
