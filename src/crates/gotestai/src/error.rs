//! Application-level error type.
//!
//! Only configuration errors and whole-run discovery failures reach this
//! type from the pipeline; per-package failures stay inside the run
//! summary so a batch can partially succeed.

use thiserror::Error;

/// Result type alias for gotestai operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Fatal errors that terminate the process with a non-zero status.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configuration path that exists but has no implementation yet.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Package discovery failed for the whole run.
    #[error(transparent)]
    Discovery(#[from] discovery::DiscoveryError),

    /// Provider gateway failure surfaced as fatal.
    #[error(transparent)]
    Llm(#[from] llm::LlmError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
