//! Model sampling settings shared across providers.

use serde::{Deserialize, Serialize};

/// Default sampling temperature when the caller leaves it unset.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Sampling and budget settings for one generation call.
///
/// Every field is optional; each backend passes through only the settings
/// it supports. `max_input_tokens` is enforced by the gateway before the
/// request is issued, never by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    pub temperature: Option<f32>,
    pub max_input_tokens: Option<usize>,
    pub max_output_tokens: Option<usize>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<usize>,
}

impl ModelSettings {
    /// Effective temperature, falling back to the shared default.
    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Set the maximum number of output tokens.
    pub fn with_max_output_tokens(mut self, tokens: usize) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set the maximum number of input tokens.
    pub fn with_max_input_tokens(mut self, tokens: usize) -> Self {
        self.max_input_tokens = Some(tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_defaults() {
        let settings = ModelSettings::default();
        assert_eq!(settings.temperature_or_default(), DEFAULT_TEMPERATURE);

        let settings = ModelSettings::default().with_temperature(0.2);
        assert_eq!(settings.temperature_or_default(), 0.2);
    }

    #[test]
    fn test_builder_chain() {
        let settings = ModelSettings::default()
            .with_max_output_tokens(10_000)
            .with_max_input_tokens(32_000);

        assert_eq!(settings.max_output_tokens, Some(10_000));
        assert_eq!(settings.max_input_tokens, Some(32_000));
        assert!(settings.top_p.is_none());
    }
}
