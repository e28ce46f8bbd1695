//! Google Gemini client.
//!
//! Talks to the `generateContent` endpoint with a `responseSchema` so the
//! model replies with a JSON object matching the requested shape.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::{LlmError, Result};
use crate::provider::GenerativeModel;
use crate::schema::ResponseSchema;
use crate::settings::ModelSettings;
use crate::tokenizer::TokenCounter;

/// Google Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    config: ProviderConfig,
    client: Client,
    counter: TokenCounter,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: ProviderConfig, counter: TokenCounter) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            config,
            client,
            counter,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    async fn generate_object(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        settings: &ModelSettings,
    ) -> Result<Value> {
        // Gemini API URL format: base_url/models/{model}:generateContent
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let req_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: settings.temperature_or_default(),
                max_output_tokens: settings.max_output_tokens,
                top_p: settings.top_p,
                top_k: settings.top_k,
                presence_penalty: settings.presence_penalty,
                frequency_penalty: settings.frequency_penalty,
                response_mime_type: "application/json".to_string(),
                response_schema: schema.gemini_schema(),
            },
        };

        // Gemini uses the API key as a query parameter
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(&req_body)
            .send()
            .await
            .map_err(LlmError::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status.as_u16() == 401 || status.as_u16() == 403 {
                LlmError::AuthenticationError(error_text)
            } else if status.as_u16() == 429 {
                LlmError::RateLimitExceeded(error_text)
            } else {
                LlmError::ProviderError(format!("Gemini API error {}: {}", status, error_text))
            });
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let candidate = gemini_resp
            .candidates
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("no candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();

        // With responseMimeType=application/json the candidate text is the
        // JSON object itself.
        serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("candidate is not valid JSON: {}", e)))
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
