//! # Recommendation Flow
//!
//! Two-stage state machine run once per request:
//!
//! ```text
//! FETCH ──gate false──▶ TERMINAL(stage one result)
//!   │
//!   └──gate true──▶ RANK ──▶ TERMINAL(stage two result)
//! ```
//!
//! Stages run strictly in sequence; the rank stage receives the raw fetch
//! output as its `context`. Whatever the ranker returns, the flow drops
//! history entries from its selection and caps it at the target count.
//! Nothing is retried. A stage that fails to run at all terminates the
//! flow with a malformed result, which the normalizer reports as corrupt
//! output.

use std::sync::Arc;
use std::time::Instant;

use agent_client::{Stage, StageInputs, StageOutput, StageRunner, TokenUsage};
use data_loader::{ActivityRef, Recommendation, ReferenceCatalog};
use serde_json::Value;
use tracing::{info, warn};

use crate::agent_result::AgentResult;
use crate::error::Result;
use crate::gate::has_candidates;
use crate::normalizer::normalize;

/// Which request shape the flow serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowVariant {
    /// Several activities, no history
    Multi,
    /// One activity; previously issued recommendations are excluded
    Single,
}

impl FlowVariant {
    pub fn fetch_stage(self) -> Stage {
        match self {
            FlowVariant::Multi => Stage::FetchCandidatesMulti,
            FlowVariant::Single => Stage::FetchCandidatesSingle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Fetch,
    /// Gate passed; holds the fetch output handed to the ranker
    Rank { candidates: StageOutput },
    Terminal(AgentResult),
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Terminal(_))
    }
}

/// What a finished flow hands to the service layer
#[derive(Debug, Clone, PartialEq)]
pub struct FlowOutcome {
    pub result: AgentResult,
    /// Summed over every stage that ran; `None` if none reported usage
    pub token_usage: Option<TokenUsage>,
    pub stages_run: Vec<Stage>,
}

impl FlowOutcome {
    pub fn normalize(&self) -> Result<Vec<Recommendation>> {
        normalize(&self.result)
    }

    pub fn total_tokens(&self) -> Option<u64> {
        self.token_usage.map(|usage| usage.total_tokens)
    }
}

/// One request's pass through the agent stages. Build a fresh flow per
/// request; only the runner and the catalog are shared.
pub struct RecommendationFlow {
    runner: Arc<dyn StageRunner>,
    variant: FlowVariant,
    inputs: StageInputs,
    state: FlowState,
    token_usage: Option<TokenUsage>,
    stages_run: Vec<Stage>,
}

impl RecommendationFlow {
    pub fn multi(
        runner: Arc<dyn StageRunner>,
        catalog: Arc<ReferenceCatalog>,
        activities: &[ActivityRef],
        target_count: u32,
    ) -> Self {
        let inputs = StageInputs::new(
            activities.iter().map(|a| a.id.clone()).collect(),
            activities.iter().map(|a| a.name.clone()).collect(),
            target_count,
            catalog,
        );
        Self::with_inputs(runner, FlowVariant::Multi, inputs)
    }

    pub fn single(
        runner: Arc<dyn StageRunner>,
        catalog: Arc<ReferenceCatalog>,
        activity: ActivityRef,
        target_count: u32,
        history: Vec<String>,
    ) -> Self {
        let inputs = StageInputs::new(vec![activity.id], vec![activity.name], target_count, catalog)
            .with_history(history);
        Self::with_inputs(runner, FlowVariant::Single, inputs)
    }

    fn with_inputs(runner: Arc<dyn StageRunner>, variant: FlowVariant, inputs: StageInputs) -> Self {
        Self {
            runner,
            variant,
            inputs,
            state: FlowState::Fetch,
            token_usage: None,
            stages_run: Vec::new(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Advance by one transition. A terminal flow stays where it is.
    pub async fn step(&mut self) -> &FlowState {
        if self.state.is_terminal() {
            return &self.state;
        }

        let next = match self.rank_context() {
            None => {
                let stage = self.variant.fetch_stage();
                let inputs = self.inputs.clone();
                match self.invoke(stage, &inputs).await {
                    Ok(output) => {
                        let result = AgentResult::classify(&output);
                        if has_candidates(&result) {
                            FlowState::Rank { candidates: output }
                        } else {
                            info!("No candidates from {}, skipping {}", stage, Stage::RankAndSelect);
                            FlowState::Terminal(result)
                        }
                    }
                    Err(result) => FlowState::Terminal(result),
                }
            }
            Some(context) => {
                let inputs = self.inputs.clone().with_context(context);
                match self.invoke(Stage::RankAndSelect, &inputs).await {
                    Ok(output) => {
                        let result = AgentResult::classify(&output);
                        FlowState::Terminal(enforce_selection(result, &self.inputs))
                    }
                    Err(result) => FlowState::Terminal(result),
                }
            }
        };
        self.state = next;
        &self.state
    }

    fn rank_context(&self) -> Option<String> {
        match &self.state {
            FlowState::Rank { candidates } => Some(candidates.raw.clone()),
            _ => None,
        }
    }

    /// Run to completion
    pub async fn run(mut self) -> FlowOutcome {
        let start_time = Instant::now();
        info!(
            "Starting {:?} flow for {} activities (target: {})",
            self.variant,
            self.inputs.activity_ids.len(),
            self.inputs.max_recommendation_amount
        );

        while !self.state.is_terminal() {
            self.step().await;
        }

        let elapsed = start_time.elapsed();
        info!(
            "Flow finished after {} stages in {:.2?}",
            self.stages_run.len(),
            elapsed
        );

        let result = match self.state {
            FlowState::Terminal(result) => result,
            // loop above only exits on a terminal state
            _ => AgentResult::Malformed("flow stopped before reaching a result".to_string()),
        };
        FlowOutcome {
            result,
            token_usage: self.token_usage,
            stages_run: self.stages_run,
        }
    }

    /// Run one stage, accounting tokens. An invocation failure comes back
    /// as a malformed result.
    async fn invoke(
        &mut self,
        stage: Stage,
        inputs: &StageInputs,
    ) -> std::result::Result<StageOutput, AgentResult> {
        self.stages_run.push(stage);
        let stage_start = Instant::now();

        match self.runner.invoke(stage, inputs).await {
            Ok(output) => {
                info!(
                    "Stage {} completed via {} in {:.2?}",
                    stage,
                    self.runner.name(),
                    stage_start.elapsed()
                );
                if let Some(usage) = output.token_usage {
                    self.add_usage(usage);
                }
                Ok(output)
            }
            Err(e) => {
                warn!("Stage {} failed via {}: {}", stage, self.runner.name(), e);
                Err(AgentResult::Malformed(e.to_string()))
            }
        }
    }

    fn add_usage(&mut self, usage: TokenUsage) {
        let total = self.token_usage.get_or_insert_with(TokenUsage::default);
        total.prompt_tokens += usage.prompt_tokens;
        total.completion_tokens += usage.completion_tokens;
        total.total_tokens += usage.total_tokens;
    }
}

/// Remove history entries from a rank selection and cap it at the target
/// count. Other shapes pass through for the normalizer to judge.
fn enforce_selection(result: AgentResult, inputs: &StageInputs) -> AgentResult {
    match result {
        AgentResult::Parsed(Value::Object(mut map)) => {
            if let Some(Value::Array(items)) = map.get_mut("recommendations") {
                let history = inputs.history.as_deref().unwrap_or_default();
                let before = items.len();

                items.retain(|item| {
                    !item
                        .get("recommendation")
                        .and_then(Value::as_str)
                        .is_some_and(|text| history.iter().any(|h| h == text))
                });
                items.truncate(inputs.max_recommendation_amount as usize);

                if items.len() != before {
                    warn!(
                        "Ranker returned {} recommendations, kept {} (target {}, {} in history)",
                        before,
                        items.len(),
                        inputs.max_recommendation_amount,
                        history.len()
                    );
                }
            }
            AgentResult::Parsed(Value::Object(map))
        }
        other => other,
    }
}
