//! Runtime settings and the local configuration store.
//!
//! Settings are built once at startup from three layers: built-in
//! defaults, then the `KEY=VALUE` config file, then the process
//! environment, with the environment winning. The value is passed by
//! reference into the orchestrator and gateway; no ambient lookups from
//! deep call sites.

use std::collections::BTreeMap;
use std::path::PathBuf;

use llm::{ModelSettings, Provider};
use tracing::debug;

use crate::error::{AppError, Result};

/// Name of the config file under `~/.config/gotestai/`.
pub const CONFIG_FILENAME: &str = "config.env";

const DEFAULT_MAX_CONCURRENT: usize = 4;
const DEFAULT_MAX_OUTPUT_TOKENS: usize = 10_000;

/// Newline-delimited `KEY=VALUE` store in the user's config directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the default location (`~/.config/gotestai/config.env`).
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config("could not determine config directory".to_string()))?;
        Ok(Self {
            path: dir.join("gotestai").join(CONFIG_FILENAME),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read all entries. A missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        let mut entries = BTreeMap::new();

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(AppError::Io(e)),
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        debug!("Loaded {} config entries from {}", entries.len(), self.path.display());
        Ok(entries)
    }

    /// Merge the given entries into the store and write it back whole.
    pub fn set(&self, updates: &[(String, String)]) -> Result<()> {
        let mut entries = self.load()?;
        for (key, value) in updates {
            entries.insert(key.clone(), value.clone());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        for (key, value) in &entries {
            content.push_str(&format!("{}={}\n", key, value));
        }
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Immutable runtime settings for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: Provider,
    pub model: Option<String>,
    pub skip_if_tests_exist: bool,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub max_concurrent: usize,
    pub max_output_tokens: Option<usize>,
    pub max_input_tokens: Option<usize>,
}

impl Settings {
    /// Load settings with environment > config file > defaults precedence.
    pub fn load(store: &ConfigStore) -> Result<Self> {
        let file = store.load()?;
        Self::from_sources(&file, |key| std::env::var(key).ok())
    }

    /// Build settings from an explicit file map and environment lookup.
    pub fn from_sources<F>(file: &BTreeMap<String, String>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).or_else(|| file.get(key).cloned());

        let provider = match get("PROVIDER") {
            Some(name) => name
                .parse::<Provider>()
                .map_err(|e| AppError::Config(e.to_string()))?,
            None => Provider::Google,
        };

        let skip_if_tests_exist = match get("SKIP_PACKAGE_IF_TESTS_EXISTS") {
            Some(value) => parse_bool("SKIP_PACKAGE_IF_TESTS_EXISTS", &value)?,
            None => true,
        };

        Ok(Self {
            provider,
            model: get("MODEL"),
            skip_if_tests_exist,
            google_api_key: get(Provider::Google.api_key_var()),
            openai_api_key: get(Provider::OpenAi.api_key_var()),
            max_concurrent: parse_opt_usize("MAX_CONCURRENT", get("MAX_CONCURRENT"))?
                .unwrap_or(DEFAULT_MAX_CONCURRENT),
            max_output_tokens: Some(
                parse_opt_usize("MAX_OUTPUT_TOKENS", get("MAX_OUTPUT_TOKENS"))?
                    .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            ),
            max_input_tokens: parse_opt_usize("MAX_INPUT_TOKENS", get("MAX_INPUT_TOKENS"))?,
        })
    }

    /// API key for the given provider, if configured.
    pub fn api_key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google_api_key.as_deref(),
            Provider::OpenAi => self.openai_api_key.as_deref(),
        }
    }

    /// Model sampling settings for generation calls.
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            max_output_tokens: self.max_output_tokens,
            max_input_tokens: self.max_input_tokens,
            ..ModelSettings::default()
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Config(format!(
            "invalid boolean for {}: {}",
            key, other
        ))),
    }
}

fn parse_opt_usize(key: &str, value: Option<String>) -> Result<Option<usize>> {
    value
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| AppError::Config(format!("invalid number for {}: {}", key, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_sources(&BTreeMap::new(), no_env).unwrap();
        assert_eq!(settings.provider, Provider::Google);
        assert!(settings.skip_if_tests_exist);
        assert_eq!(settings.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(settings.max_output_tokens, Some(DEFAULT_MAX_OUTPUT_TOKENS));
        assert!(settings.max_input_tokens.is_none());
        assert!(settings.google_api_key.is_none());
    }

    #[test]
    fn test_environment_wins_over_file() {
        let mut file = BTreeMap::new();
        file.insert("PROVIDER".to_string(), "GOOGLE".to_string());
        file.insert("MAX_CONCURRENT".to_string(), "2".to_string());

        let settings = Settings::from_sources(&file, |key| match key {
            "PROVIDER" => Some("OPENAI".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.provider, Provider::OpenAi);
        // file value still applies where the environment is silent
        assert_eq!(settings.max_concurrent, 2);
    }

    #[test]
    fn test_invalid_provider_is_config_error() {
        let mut file = BTreeMap::new();
        file.insert("PROVIDER".to_string(), "ANTHROPIC".to_string());

        let err = Settings::from_sources(&file, no_env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invalid_boolean_is_config_error() {
        let mut file = BTreeMap::new();
        file.insert("SKIP_PACKAGE_IF_TESTS_EXISTS".to_string(), "maybe".to_string());

        let err = Settings::from_sources(&file, no_env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_api_key_for_provider() {
        let mut file = BTreeMap::new();
        file.insert(
            "GOOGLE_GENERATIVE_AI_API_KEY".to_string(),
            "g-key".to_string(),
        );
        file.insert("OPENAI_API_KEY".to_string(), "o-key".to_string());

        let settings = Settings::from_sources(&file, no_env).unwrap();
        assert_eq!(settings.api_key_for(Provider::Google), Some("g-key"));
        assert_eq!(settings.api_key_for(Provider::OpenAi), Some("o-key"));
    }

    #[test]
    fn test_store_round_trip_and_merge() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at(dir.path().join("nested").join(CONFIG_FILENAME));

        assert!(store.load().unwrap().is_empty());

        store
            .set(&[("OPENAI_API_KEY".to_string(), "first".to_string())])
            .unwrap();
        store
            .set(&[
                ("OPENAI_API_KEY".to_string(), "second".to_string()),
                ("PROVIDER".to_string(), "OPENAI".to_string()),
            ])
            .unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.get("OPENAI_API_KEY"), Some(&"second".to_string()));
        assert_eq!(entries.get("PROVIDER"), Some(&"OPENAI".to_string()));
    }

    #[test]
    fn test_store_tolerates_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "\nPROVIDER=GOOGLE\n\n  \nMODEL=gemini-2.0-flash\n").unwrap();

        let entries = ConfigStore::at(&path).load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("MODEL"), Some(&"gemini-2.0-flash".to_string()));
    }
}
