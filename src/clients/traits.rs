use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One "generate content" call: model, prompt and an optional response schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    /// When set, the reply is expected to be JSON matching this schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(String),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Parse(err.to_string())
    }
}

/// External text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
