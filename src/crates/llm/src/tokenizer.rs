//! Token counting for pre-flight budget checks.

use std::sync::Arc;

use tiktoken_rs::CoreBPE;

use crate::error::{LlmError, Result};

/// Token counter wrapping tiktoken's cl100k_base tokenizer.
///
/// Both supported backends accept cl100k counts as a budget estimate; a
/// provider with its own tokenizer can override counting at the trait
/// level. Construction loads the BPE tables once; the counter is cheap to
/// clone and safe to share across tasks.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    /// Load the cl100k_base tokenizer.
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| LlmError::ProviderError(format!("failed to load tokenizer: {}", e)))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    /// Count tokens in the given text.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_empty() {
        let counter = TokenCounter::new().unwrap();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_count_is_deterministic() {
        let counter = TokenCounter::new().unwrap();
        let text = "package main\n\nfunc main() {}\n";
        let first = counter.count(text);
        assert!(first > 0);
        assert_eq!(first, counter.count(text));
    }

    #[test]
    fn test_longer_text_counts_more() {
        let counter = TokenCounter::new().unwrap();
        let short = counter.count("func Add(a, b int) int");
        let long = counter.count("func Add(a, b int) int { return a + b }");
        assert!(long > short);
    }
}
