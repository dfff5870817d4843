//! YAML configuration for service endpoints and credentials.
//!
//! Configuration resolves in three layers, later layers winning:
//! 1. Built-in defaults (public endpoints, a local summarizer)
//! 2. The YAML config file, when present
//! 3. CLI flags / environment variables (`SERPAPI_KEY`, `SUMMARIZER_API_KEY`)
//!
//! The search-service credential is deliberately never hardcoded; startup
//! fails with a clear error when no key can be resolved.

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, warn};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// News-search service settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Summarization model settings.
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// News-search service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search API endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// API key for the search service. Required at startup.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: None,
        }
    }
}

/// Summarization model settings for an OpenAI-compatible API.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// Base URL of the OpenAI-compatible API, without the trailing route.
    #[serde(default = "default_summarizer_api_base")]
    pub api_base: String,
    /// Model identifier sent with each request.
    #[serde(default = "default_summarizer_model")]
    pub model: String,
    /// API key, when the endpoint requires one.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_base: default_summarizer_api_base(),
            model: default_summarizer_model(),
            api_key: None,
        }
    }
}

fn default_search_endpoint() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_summarizer_api_base() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_summarizer_model() -> String {
    "qwen2.5:7b-instruct".to_string()
}

impl AppConfig {
    /// Parse a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from an optional file path.
    ///
    /// An explicitly named file must exist; the default path
    /// (`config.yaml`) is allowed to be absent, in which case the built-in
    /// defaults are used.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => ("config.yaml", false),
        };

        if !Path::new(path).exists() {
            if required {
                return Err(format!("config file not found: {path}").into());
            }
            warn!(path, "No config file found; using built-in defaults");
            return Ok(Self::default());
        }

        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&yaml)?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    /// Apply CLI/env credential overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        serpapi_key: Option<String>,
        summarizer_api_key: Option<String>,
    ) -> Self {
        if serpapi_key.is_some() {
            self.search.api_key = serpapi_key;
        }
        if summarizer_api_key.is_some() {
            self.summarizer.api_key = summarizer_api_key;
        }
        self
    }

    /// Return the resolved search API key, or a startup error telling the
    /// user where to put it.
    pub fn require_search_key(&self) -> Result<String, Box<dyn Error>> {
        match self.search.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(
                "no search API key configured; set SERPAPI_KEY, pass --serpapi-key, \
                 or add search.api_key to the config file"
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.search.endpoint, "https://serpapi.com/search");
        assert!(config.search.api_key.is_none());
        assert_eq!(config.summarizer.api_base, "http://localhost:11434/v1");
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
search:
  endpoint: https://serpapi.example.com/search
  api_key: file-key
summarizer:
  api_base: https://api.example.com/v1
  model: test-model
  api_key: model-key
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.search.endpoint, "https://serpapi.example.com/search");
        assert_eq!(config.search.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.summarizer.model, "test-model");
        assert_eq!(config.summarizer.api_key.as_deref(), Some("model-key"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let yaml = r#"
search:
  api_key: file-key
"#;
        let config = AppConfig::from_yaml(yaml)
            .unwrap()
            .with_overrides(Some("env-key".to_string()), None);
        assert_eq!(config.search.api_key.as_deref(), Some("env-key"));
        // absent override leaves the file value alone
        let config = AppConfig::from_yaml(yaml).unwrap().with_overrides(None, None);
        assert_eq!(config.search.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_require_search_key() {
        let config = AppConfig::default();
        assert!(config.require_search_key().is_err());

        let config = config.with_overrides(Some("k".to_string()), None);
        assert_eq!(config.require_search_key().unwrap(), "k");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let config = AppConfig::from_yaml("search:\n  api_key: \"\"\n").unwrap();
        assert!(config.require_search_key().is_err());
    }
}
