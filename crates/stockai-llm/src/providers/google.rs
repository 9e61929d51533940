//! Google Gemini backend implementation
//!
//! This module implements the LlmBackend trait for Google's Gemini models
//! via the Generative Language API.
//! See: https://ai.google.dev/api/generate-content

use crate::{CompletionRequest, CompletionResponse, LlmBackend, Result, Role, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Google Gemini backend
pub struct GoogleBackend {
    client: Client,
    api_key: String,
}

impl GoogleBackend {
    /// Create a new Google backend
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google AI Studio API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl LlmBackend for GoogleBackend {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Google Generative Language API");

        let contents = request
            .messages
            .iter()
            .map(|message| GoogleContent {
                // Gemini names the assistant role "model"
                role: match message.role {
                    Role::Assistant => "model".to_string(),
                    Role::User | Role::System => "user".to_string(),
                },
                parts: vec![GooglePart {
                    text: message.content.clone(),
                }],
            })
            .collect();

        let google_request = GoogleRequest {
            contents,
            system_instruction: request.system.map(|system| GoogleSystemInstruction {
                parts: vec![GooglePart { text: system }],
            }),
            generation_config: GoogleGenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let url = format!(
            "{GOOGLE_API_BASE}/models/{}:generateContent",
            request.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&google_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => crate::LlmError::AuthenticationFailed,
                429 => crate::LlmError::RateLimitExceeded(error_text),
                400 => crate::LlmError::InvalidRequest(error_text),
                404 => crate::LlmError::ModelNotFound(request.model),
                _ => crate::LlmError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let google_response: GoogleResponse = response.json().await.map_err(|e| {
            crate::LlmError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let candidate = google_response.candidates.into_iter().next().ok_or_else(|| {
            crate::LlmError::UnexpectedResponse("Response contained no candidates".to_string())
        })?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = google_response.usage_metadata.unwrap_or_default();
        debug!(
            "Received response - tokens: {}/{}",
            usage.prompt_token_count, usage.candidates_token_count
        );

        Ok(CompletionResponse {
            text,
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

// Gemini-specific request/response types
// These match the generateContent API format exactly

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleRequest {
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GoogleSystemInstruction>,
    generation_config: GoogleGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GoogleContent {
    #[serde(default)]
    role: String,
    parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GooglePart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GoogleSystemInstruction {
    parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleResponse {
    candidates: Vec<GoogleCandidate>,
    usage_metadata: Option<GoogleUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GoogleCandidate {
    content: GoogleContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_creation() {
        let backend = GoogleBackend::new("test-key");
        assert!(backend.is_ok());
        assert_eq!(backend.unwrap().name(), "google");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Sell."}]}}
            ],
            "usageMetadata": {"promptTokenCount": 15, "candidatesTokenCount": 2}
        }"#;
        let response: GoogleResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates[0].content.parts[0].text, "Sell.");
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 15);
    }
}
