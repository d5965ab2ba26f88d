//! Server configuration, read from the environment once at start-up.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};

pub const DEFAULT_LOG_FILTER: &str = "info,server=debug,pipeline=debug";

/// Which [`agent_client::StageRunner`] answers the stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentBackend {
    /// Chat-completions LLM service configured through `LLM_*`
    #[default]
    Llm,
    /// Deterministic matcher/ranker over the reference dataset
    Catalog,
}

impl FromStr for AgentBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(AgentBackend::Llm),
            "catalog" => Ok(AgentBackend::Catalog),
            other => Err(anyhow!("unknown agent backend {other:?} (expected llm or catalog)")),
        }
    }
}

impl fmt::Display for AgentBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentBackend::Llm => f.write_str("llm"),
            AgentBackend::Catalog => f.write_str("catalog"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub backend: AgentBackend,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            catalog_path: PathBuf::from("data/reference_catalog.json"),
            backend: AgentBackend::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("GREENRECS_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("GREENRECS_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("GREENRECS_PORT is not a valid port: {port:?}"))?;
        }
        if let Some(path) = lookup("GREENRECS_CATALOG") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(backend) = lookup("GREENRECS_AGENT_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(filter) = lookup("GREENRECS_LOG") {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("GREENRECS_HOST must not be empty");
        }
        if self.catalog_path.as_os_str().is_empty() {
            bail!("GREENRECS_CATALOG must not be empty");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Failed to parse address {}:{}", self.host, self.port))
    }
}
