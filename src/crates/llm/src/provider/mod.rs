//! Provider identifiers and the backend capability trait.
//!
//! Each supported backend implements [`GenerativeModel`]; the concrete
//! client is selected once at gateway construction, so nothing downstream
//! ever branches on a provider name.

mod gemini;
mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::schema::ResponseSchema;
use crate::settings::ModelSettings;

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    OpenAi,
}

impl Provider {
    /// Environment/config variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Google => "GOOGLE_GENERATIVE_AI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Default model identifier for this provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Google => "gemini-2.0-flash",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }

    /// Default API base URL for this provider.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Google => write!(f, "GOOGLE"),
            Provider::OpenAi => write!(f, "OPENAI"),
        }
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GOOGLE" | "GEMINI" => Ok(Provider::Google),
            "OPENAI" => Ok(Provider::OpenAi),
            other => Err(LlmError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Capability set every backend exposes: token counting and structured
/// generation.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Count prompt tokens with this backend's tokenizer.
    fn count_tokens(&self, text: &str) -> usize;

    /// Submit a prompt to the structured-generation endpoint and return the
    /// raw JSON object the backend produced. Schema validation happens in
    /// the gateway.
    async fn generate_object(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        settings: &ModelSettings,
    ) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("GOOGLE".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!(matches!(
            "ANTHROPIC".parse::<Provider>(),
            Err(LlmError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_api_key_vars() {
        assert_eq!(Provider::Google.api_key_var(), "GOOGLE_GENERATIVE_AI_API_KEY");
        assert_eq!(Provider::OpenAi.api_key_var(), "OPENAI_API_KEY");
    }
}
