//! OpenAI client.
//!
//! Uses the chat completions endpoint with a `json_schema` response format
//! so the model replies with a JSON object matching the requested shape.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::error::{LlmError, Result};
use crate::provider::GenerativeModel;
use crate::schema::ResponseSchema;
use crate::settings::ModelSettings;
use crate::tokenizer::TokenCounter;

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: ProviderConfig,
    client: Client,
    counter: TokenCounter,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given configuration.
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
impl GenerativeModel for OpenAiClient {
    fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    async fn generate_object(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        settings: &ModelSettings,
    ) -> Result<Value> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let req_body = OpenAiRequest {
            model: self.config.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: settings.temperature_or_default(),
            max_tokens: settings.max_output_tokens,
            top_p: settings.top_p,
            frequency_penalty: settings.frequency_penalty,
            presence_penalty: settings.presence_penalty,
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name(),
                    "strict": true,
                    "schema": schema.json_schema(),
                },
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&req_body)
            .send()
            .await
            .map_err(LlmError::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status.as_u16() == 401 {
                LlmError::AuthenticationError(error_text)
            } else if status.as_u16() == 429 {
                LlmError::RateLimitExceeded(error_text)
            } else {
                LlmError::ProviderError(format!("OpenAI API error {}: {}", status, error_text))
            });
        }

        let openai_resp: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = openai_resp
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        serde_json::from_str(&choice.message.content).map_err(|e| {
            LlmError::InvalidResponse(format!("message content is not valid JSON: {}", e))
        })
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    response_format: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ProviderConfig::new("test-key", "https://api.openai.com/v1", "gpt-4o-mini");
        let _client = OpenAiClient::new(config, TokenCounter::new().unwrap()).unwrap();
    }

    #[test]
    fn test_request_serialization_skips_unset_settings() {
        let req = OpenAiRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            response_format: json!({ "type": "json_schema" }),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("top_p").is_none());
        assert_eq!(value["temperature"], 0.7);
    }
}
