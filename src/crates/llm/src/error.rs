//! Error types for provider gateway operations.

use thiserror::Error;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to a generative backend.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// API key missing for the requested provider.
    #[error("API key required for provider {0}")]
    ApiKeyNotFound(String),

    /// Requested provider is not supported.
    #[error("Model provider {0} not supported")]
    UnsupportedProvider(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Prompt token count exceeds the configured input budget.
    #[error("Input token count exceeds the limit of {limit}: {count}")]
    BudgetExceeded { count: usize, limit: usize },

    /// Response did not match the requested schema.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// General provider error.
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl LlmError {
    /// Configuration-class errors are never downgraded by a skip policy.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LlmError::ApiKeyNotFound(_) | LlmError::UnsupportedProvider(_)
        )
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::InvalidResponse(err.to_string())
    }
}
