//! Stage identifiers and the data exchanged with a stage.

use data_loader::ReferenceCatalog;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The agent responsible for a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    /// Fetches candidate recommendations matching the requested activities
    Matcher,
    /// Ranks candidates and selects the final set
    Ranker,
}

/// A named stage of the recommendation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FetchCandidatesMulti,
    FetchCandidatesSingle,
    RankAndSelect,
}

impl Stage {
    /// Task name as known to the agent pipeline
    pub fn name(self) -> &'static str {
        match self {
            Stage::FetchCandidatesMulti => "fetch_candidates_multi_task",
            Stage::FetchCandidatesSingle => "fetch_candidates_single_task",
            Stage::RankAndSelect => "rank_and_select_task",
        }
    }

    pub fn agent(self) -> AgentRole {
        match self {
            Stage::FetchCandidatesMulti | Stage::FetchCandidatesSingle => AgentRole::Matcher,
            Stage::RankAndSelect => AgentRole::Ranker,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input map handed to every stage.
///
/// Serializes with the exact keys the agent prompts refer to.
#[derive(Debug, Clone, Serialize)]
pub struct StageInputs {
    pub activity_ids: Vec<String>,
    pub activity_names: Vec<String>,
    #[serde(rename = "maxRecommendationAmount")]
    pub max_recommendation_amount: u32,
    #[serde(serialize_with = "serialize_catalog")]
    pub all_records: Arc<ReferenceCatalog>,
    /// Previously issued recommendation texts (single-activity only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<String>>,
    /// Raw output of the previous stage, given to the rank stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl StageInputs {
    pub fn new(
        activity_ids: Vec<String>,
        activity_names: Vec<String>,
        max_recommendation_amount: u32,
        all_records: Arc<ReferenceCatalog>,
    ) -> Self {
        Self {
            activity_ids,
            activity_names,
            max_recommendation_amount,
            all_records,
            history: None,
            context: None,
        }
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

fn serialize_catalog<S: Serializer>(
    catalog: &Arc<ReferenceCatalog>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    catalog.as_ref().serialize(serializer)
}

/// Token accounting reported by the LLM service for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// What a stage returned.
///
/// `raw` is always present; `json` is set only when the engine already
/// produced a parsed structured form of the output.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub raw: String,
    pub json: Option<Value>,
    pub token_usage: Option<TokenUsage>,
}

impl StageOutput {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            json: None,
            token_usage: None,
        }
    }

    pub fn from_json(json: Value) -> Self {
        Self {
            raw: json.to_string(),
            json: Some(json),
            token_usage: None,
        }
    }

    pub fn with_token_usage(mut self, usage: TokenUsage) -> Self {
        self.token_usage = Some(usage);
        self
    }
}
