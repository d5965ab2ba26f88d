//! LLM service configuration.
//!
//! Credentials are provisioned from the environment at start-up and handed
//! to the client; nothing secret is compiled in.
//!
//! Environment variables:
//! - LLM_ENDPOINT: base URL of the LLM service (required)
//! - LLM_API_KEY: API key (required)
//! - LLM_MODEL: model / deployment identifier (default "gpt-4o")
//! - LLM_API_VERSION: API version query parameter (default "2024-02-01")
//! - LLM_TIMEOUT_SECS: per-call timeout (default 120)
//! - LLM_TEMPERATURE: sampling temperature (default 0.0)

use crate::{AgentClientError, Result};
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the chat-completions service.
#[derive(Clone)]
pub struct LlmConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub model: String,
    pub api_version: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl LlmConfig {
    /// Create a config with defaults for everything but endpoint and key
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AgentClientError::Configuration(format!("invalid LLM endpoint {endpoint:?}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(AgentClientError::Configuration(format!(
                "LLM endpoint {endpoint} cannot carry a path"
            )));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AgentClientError::Configuration("LLM API key is empty".to_string()));
        }

        Ok(Self {
            endpoint,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: 0.0,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Fails if the endpoint or the API key is missing; there is no fallback
    /// credential.
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("LLM_ENDPOINT").map_err(|_| {
            AgentClientError::Configuration("LLM_ENDPOINT environment variable is required".to_string())
        })?;
        let api_key = env::var("LLM_API_KEY").map_err(|_| {
            AgentClientError::Configuration("LLM_API_KEY environment variable is required".to_string())
        })?;

        let mut config = Self::new(&endpoint, api_key)?;

        if let Ok(model) = env::var("LLM_MODEL") {
            config = config.with_model(model);
        }
        if let Ok(version) = env::var("LLM_API_VERSION") {
            config = config.with_api_version(version);
        }
        if let Ok(secs) = env::var("LLM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                AgentClientError::Configuration(format!("LLM_TIMEOUT_SECS is not a number: {secs:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            let temperature: f32 = temperature.parse().map_err(|_| {
                AgentClientError::Configuration(format!("LLM_TEMPERATURE is not a number: {temperature:?}"))
            })?;
            config = config.with_temperature(temperature);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// `{endpoint}/openai/deployments/{model}/chat/completions?api-version={version}`
    pub fn completions_url(&self) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| AgentClientError::Configuration(format!("LLM endpoint {} cannot carry a path", self.endpoint)))?
            .pop_if_empty()
            .extend(["openai", "deployments", self.model.as_str(), "chat", "completions"]);
        url.query_pairs_mut().append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

// The API key never reaches logs.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let config = LlmConfig::new("https://example.openai.azure.com", "secret")
            .unwrap()
            .with_model("gpt-4o-mini")
            .with_api_version("2024-06-01");

        assert_eq!(
            config.completions_url().unwrap().as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_completions_url_keeps_base_path() {
        let config = LlmConfig::new("http://127.0.0.1:9000/proxy/", "secret").unwrap();
        assert_eq!(
            config.completions_url().unwrap().path(),
            "/proxy/openai/deployments/gpt-4o/chat/completions"
        );
    }

    #[test]
    fn test_rejects_invalid_endpoint_and_empty_key() {
        assert!(matches!(
            LlmConfig::new("not a url", "secret"),
            Err(AgentClientError::Configuration(_))
        ));
        assert!(matches!(
            LlmConfig::new("https://example.com", "   "),
            Err(AgentClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmConfig::new("https://example.com", "super-secret-key").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
