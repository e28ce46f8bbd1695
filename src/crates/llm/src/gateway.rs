//! Provider-agnostic invocation with token-budget enforcement.

use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{LlmError, Result};
use crate::provider::{GeminiClient, GenerativeModel, OpenAiClient, Provider};
use crate::schema::{GeneratedObject, ResponseSchema};
use crate::settings::ModelSettings;
use crate::tokenizer::TokenCounter;

/// How backend failures are surfaced to the caller.
///
/// Budget and configuration errors are never downgraded; only generation
/// failures (network, quota, schema validation) are policy-governed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure and return `Ok(None)`. The default for bulk runs,
    /// where one backend hiccup should not abort the whole batch.
    Skip,
    /// Propagate the failure.
    Strict,
}

/// One generation request. Built per package, consumed exactly once.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub schema: ResponseSchema,
    pub settings: ModelSettings,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, schema: ResponseSchema, settings: ModelSettings) -> Self {
        Self {
            prompt: prompt.into(),
            schema,
            settings,
        }
    }
}

/// Gateway over one generative backend, selected at construction time.
pub struct Gateway {
    model: Box<dyn GenerativeModel>,
    provider: Provider,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Build a gateway for the given provider.
    ///
    /// A missing API key is a configuration error, distinct from any
    /// generation failure.
    pub fn for_provider(
        provider: Provider,
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::ApiKeyNotFound(provider.to_string()))?;

        let config = ProviderConfig::new(
            api_key,
            provider.default_base_url(),
            model.unwrap_or(provider.default_model()),
        );
        let counter = TokenCounter::new()?;

        let model: Box<dyn GenerativeModel> = match provider {
            Provider::Google => Box::new(GeminiClient::new(config, counter)?),
            Provider::OpenAi => Box::new(OpenAiClient::new(config, counter)?),
        };

        Ok(Self { model, provider })
    }

    /// Build a gateway around an arbitrary backend implementation.
    pub fn with_model(model: Box<dyn GenerativeModel>, provider: Provider) -> Self {
        Self { model, provider }
    }

    /// The provider this gateway was constructed for.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Submit a generation request.
    ///
    /// When `max_input_tokens` is set, the prompt is tokenized first and a
    /// count strictly greater than the limit fails without ever issuing
    /// the backend call; truncating a source-code prompt would corrupt the
    /// semantics the model has to reason about. Returns `Ok(None)` when a
    /// generation failure is skipped under [`ErrorPolicy::Skip`].
    pub async fn invoke(
        &self,
        request: GenerateRequest,
        policy: ErrorPolicy,
    ) -> Result<Option<GeneratedObject>> {
        let GenerateRequest {
            prompt,
            schema,
            settings,
        } = request;

        if let Some(limit) = settings.max_input_tokens {
            let count = self.model.count_tokens(&prompt);
            if count > limit {
                return Err(LlmError::BudgetExceeded { count, limit });
            }
            debug!(count, limit, "prompt within token budget");
        }

        let outcome = self
            .model
            .generate_object(&prompt, &schema, &settings)
            .await
            .and_then(|value| schema.parse(value));

        match outcome {
            Ok(object) => Ok(Some(object)),
            Err(err) if policy == ErrorPolicy::Skip && !err.is_config_error() => {
                warn!(provider = %self.provider, error = %err, "generation failed, skipping");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
