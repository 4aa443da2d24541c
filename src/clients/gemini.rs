use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::clients::traits::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::Config;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini REST client for the `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// `timeout_ms == 0` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout_ms: u64) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        let timeout_ms = (timeout_ms > 0).then_some(timeout_ms);
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .context("Failed to build reqwest client for Gemini")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout_ms,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.generation.base_url.clone(),
            config.runtime.api_key.clone(),
            config.generation.timeout_ms,
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn map_transport_err(&self, err: reqwest::Error) -> GenerationError {
        match self.timeout_ms {
            Some(timeout_ms) if err.is_timeout() => GenerationError::Timeout { timeout_ms },
            _ => GenerationError::Http(err.to_string()),
        }
    }
}

/// Request body for `generateContent`.
pub fn build_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "contents": [
            { "role": "user", "parts": [ { "text": request.prompt } ] }
        ]
    });
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> std::result::Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        debug!(
            "Gemini generateContent (model={}, prompt_chars={}, schema={})",
            request.model,
            request.prompt.len(),
            request.response_schema.is_some()
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;
        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(schema: Option<Value>) -> GenerationRequest {
        GenerationRequest {
            model: DEFAULT_MODEL.into(),
            prompt: "Analyze this".into(),
            response_schema: schema,
        }
    }

    #[test]
    fn test_body_without_schema_has_no_generation_config() {
        let body = build_body(&request(None));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze this");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_body_with_schema_requests_json() {
        let body = build_body(&request(Some(json!({"type": "OBJECT"}))));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ {"text": "{\"items\":"}, {"text": "[]}"} ] } },
                { "content": { "parts": [ {"text": "ignored"} ] } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(resp).unwrap(), "{\"items\":[]}");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(extract_text(resp), Err(GenerationError::EmptyResponse)));
        let resp: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert!(matches!(extract_text(resp), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9/v1beta/", None, 0).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new("http://127.0.0.1:9", Some("  ".into()), 0).unwrap();
        let err = client.generate(&request(None)).await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
