//! Chat-completions client for running stages against an LLM service.
//!
//! One stage invocation is one chat-completions call. No retries: a failed
//! call is reported to the caller as an [`AgentClientError`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::LlmConfig;
use crate::prompts::{render_messages, ChatMessage};
use crate::stage::{Stage, StageInputs, StageOutput, TokenUsage};
use crate::{AgentClientError, Result, StageRunner};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for an Azure-OpenAI-style chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: Client,
    config: LlmConfig,
}

impl ChatCompletionsClient {
    /// Build a client from configuration. Does not contact the service.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AgentClientError::Configuration(e.to_string()))?;

        info!(
            "LLM client configured for {} (model {}, api-version {})",
            config.endpoint, config.model, config.api_version
        );
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl StageRunner for ChatCompletionsClient {
    fn name(&self) -> &str {
        "chat-completions"
    }

    #[instrument(skip(self, inputs), fields(stage = stage.name(), model = %self.config.model))]
    async fn invoke(&self, stage: Stage, inputs: &StageInputs) -> Result<StageOutput> {
        let messages = render_messages(stage, inputs)?;
        let url = self.config.completions_url()?;

        debug!("Invoking stage {} ({} messages)", stage, messages.len());
        let response = self
            .http
            .post(url)
            .header("api-key", &self.config.api_key)
            .json(&ChatRequest {
                messages: &messages,
                temperature: self.config.temperature,
            })
            .send()
            .await
            .map_err(|e| {
                error!("LLM request for stage {} failed: {}", stage, e);
                AgentClientError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("LLM service returned {} for stage {}", status, stage);
            return Err(AgentClientError::Response {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentClientError::InvalidResponse("response has no message content".to_string()))?;

        let mut output = StageOutput::from_raw(strip_code_fences(&content));
        if let Some(usage) = body.usage {
            debug!("Stage {} used {} tokens", stage, usage.total_tokens);
            output = output.with_token_usage(usage);
        }
        Ok(output)
    }
}

/// Models often wrap JSON answers in a markdown fence; return the body.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.strip_suffix("```").unwrap_or(body).trim()
}
