//! Generative model provider gateway for gotestai.
//!
//! This crate abstracts over the supported generative backends behind one
//! capability trait (token counting + structured generation) and enforces
//! the input token budget before any network call is issued.
//!
//! # Supported Providers
//!
//! - **Google** - Gemini models via the `generateContent` API
//! - **OpenAI** - GPT models via the chat completions API
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{ErrorPolicy, Gateway, GenerateRequest, ModelSettings, Provider, ResponseSchema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Gateway::for_provider(
//!         Provider::Google,
//!         std::env::var("GOOGLE_GENERATIVE_AI_API_KEY").ok().as_deref(),
//!         None,
//!     )?;
//!
//!     let request = GenerateRequest::new(
//!         "Write a haiku about Go tests.",
//!         ResponseSchema::Text,
//!         ModelSettings::default().with_max_output_tokens(200),
//!     );
//!
//!     if let Some(object) = gateway.invoke(request, ErrorPolicy::Strict).await? {
//!         println!("{:?}", object);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod schema;
pub mod settings;
pub mod tokenizer;

// Re-export commonly used types
pub use config::ProviderConfig;
pub use error::{LlmError, Result};
pub use gateway::{ErrorPolicy, Gateway, GenerateRequest};
pub use provider::{GenerativeModel, Provider};
pub use schema::{GeneratedObject, GeneratedTestFile, GeneratedText, ResponseSchema};
pub use settings::ModelSettings;
pub use tokenizer::TokenCounter;
