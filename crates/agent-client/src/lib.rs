//! Agent pipeline client for the LLM-driven recommendation stages.
//!
//! This crate is the narrow boundary between GreenRecs and the agent
//! pipeline that actually talks to a language model. It provides:
//! - The [`StageRunner`] trait: invoke one named stage with an input map
//! - [`StageInputs`] / [`StageOutput`]: what goes in and what comes back
//! - [`ChatCompletionsClient`]: a chat-completions implementation over HTTPS
//! - [`LlmConfig`]: endpoint, credentials and model, injected at start-up

use async_trait::async_trait;
use thiserror::Error;

pub mod chat;
pub mod config;
pub mod prompts;
pub mod stage;

pub use chat::ChatCompletionsClient;
pub use config::LlmConfig;
pub use stage::{AgentRole, Stage, StageInputs, StageOutput, TokenUsage};

/// Errors that can occur when invoking an agent stage
#[derive(Error, Debug)]
pub enum AgentClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to connect to LLM service: {0}")]
    Connection(String),

    #[error("Request to LLM service failed: {0}")]
    Request(String),

    #[error("LLM service request timed out")]
    Timeout,

    #[error("LLM service returned status {status}: {message}")]
    Response { status: u16, message: String },

    #[error("Invalid response from LLM service: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AgentClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AgentClientError::Timeout
        } else if err.is_connect() {
            AgentClientError::Connection(err.to_string())
        } else if err.is_decode() {
            AgentClientError::InvalidResponse(err.to_string())
        } else {
            AgentClientError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AgentClientError {
    fn from(err: serde_json::Error) -> Self {
        AgentClientError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentClientError>;

/// Executes one stage of the agent pipeline.
///
/// Implementations block (asynchronously) until the stage produced a
/// result or failed; callers never see partial output.
///
/// `Send + Sync` so a single runner can be shared by concurrent requests.
#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Returns the name of this runner (for logging)
    fn name(&self) -> &str;

    /// Run `stage` with `inputs` and return its raw output.
    async fn invoke(&self, stage: Stage, inputs: &StageInputs) -> Result<StageOutput>;
}
