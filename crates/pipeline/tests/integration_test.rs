//! Integration tests for the recommendation flow.
//!
//! A scripted runner replays canned stage outputs and records every call,
//! so the tests can check both the transitions and what each stage saw.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_client::{
    AgentClientError, Result as AgentResultOf, Stage, StageInputs, StageOutput, StageRunner,
    TokenUsage,
};
use async_trait::async_trait;
use data_loader::{ActivityRef, ReferenceCatalog};
use pipeline::{AgentResult, FlowState, RecommendationError, RecommendationFlow};
use serde_json::json;

// ============================================================================
// Scripted runner
// ============================================================================

struct ScriptedRunner {
    replies: Mutex<VecDeque<AgentResultOf<StageOutput>>>,
    calls: Mutex<Vec<(Stage, StageInputs)>>,
}

impl ScriptedRunner {
    fn new(replies: Vec<AgentResultOf<StageOutput>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(Stage, StageInputs)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageRunner for ScriptedRunner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, stage: Stage, inputs: &StageInputs) -> AgentResultOf<StageOutput> {
        self.calls.lock().unwrap().push((stage, inputs.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentClientError::InvalidResponse("script exhausted".into())))
    }
}

fn record(text: &str) -> serde_json::Value {
    json!({
        "activityId": "uuid-1",
        "activityName": "Natural Gas",
        "scope": "1.1",
        "recommendation": text,
        "impactLevel": "HIGH",
        "estimatedReductionPercentage": 60.0,
        "feasibilityScore": 0.6,
        "feasibilityLevel": "MEDIUM",
        "cost": 150000.0,
        "infrastructureRequirements": "Electrical upgrade",
        "technologyStatus": "Mature"
    })
}

fn usage(total: u64) -> TokenUsage {
    TokenUsage {
        prompt_tokens: total - 10,
        completion_tokens: 10,
        total_tokens: total,
    }
}

fn catalog() -> Arc<ReferenceCatalog> {
    Arc::new(ReferenceCatalog::new())
}

fn natural_gas() -> Vec<ActivityRef> {
    vec![ActivityRef::new("uuid-1", "Natural Gas")]
}

// ============================================================================
// Transitions
// ============================================================================

#[tokio::test]
async fn test_gate_pass_runs_both_stages() {
    let fetched = StageOutput::from_json(json!({
        "recommendations": [record("Install heat pumps"), record("Install smart thermostats")]
    }));
    let runner = ScriptedRunner::new(vec![
        Ok(fetched.clone()),
        Ok(StageOutput::from_json(json!({"recommendations": [record("Install heat pumps")]}))),
    ]);

    let outcome = RecommendationFlow::multi(runner.clone(), catalog(), &natural_gas(), 1)
        .run()
        .await;

    assert_eq!(outcome.stages_run, vec![Stage::FetchCandidatesMulti, Stage::RankAndSelect]);
    let recs = outcome.normalize().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].recommendation, "Install heat pumps");

    // rank stage sees the fetch output verbatim
    let calls = runner.calls();
    assert_eq!(calls[1].1.context.as_deref(), Some(fetched.raw.as_str()));
    assert_eq!(calls[0].1.context, None);
}

#[tokio::test]
async fn test_sentinel_short_circuits_rank() {
    let runner = ScriptedRunner::new(vec![Ok(StageOutput::from_raw("False"))]);

    let outcome = RecommendationFlow::multi(runner.clone(), catalog(), &natural_gas(), 2)
        .run()
        .await;

    assert_eq!(outcome.stages_run, vec![Stage::FetchCandidatesMulti]);
    assert_eq!(outcome.result, AgentResult::Sentinel(false));
    assert_eq!(outcome.normalize(), Err(RecommendationError::NoActivity));
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_empty_fetch_short_circuits_rank() {
    let runner = ScriptedRunner::new(vec![Ok(StageOutput::from_raw(r#"{"recommendations": []}"#))]);

    let outcome = RecommendationFlow::multi(runner.clone(), catalog(), &natural_gas(), 2)
        .run()
        .await;

    assert_eq!(outcome.stages_run.len(), 1);
    assert_eq!(outcome.normalize(), Err(RecommendationError::NoActivity));
}

#[tokio::test]
async fn test_step_by_step_transitions() {
    let runner = ScriptedRunner::new(vec![
        Ok(StageOutput::from_raw("[1, 2]")),
        Ok(StageOutput::from_raw("false")),
    ]);
    let mut flow = RecommendationFlow::multi(runner, catalog(), &natural_gas(), 2);

    assert_eq!(flow.state(), &FlowState::Fetch);
    assert!(matches!(flow.step().await, FlowState::Rank { .. }));
    assert_eq!(flow.step().await, &FlowState::Terminal(AgentResult::Sentinel(false)));
    // terminal state is sticky
    assert_eq!(flow.step().await, &FlowState::Terminal(AgentResult::Sentinel(false)));
}

#[tokio::test]
async fn test_fetch_failure_is_corrupt_output() {
    let runner = ScriptedRunner::new(vec![Err(AgentClientError::Timeout)]);

    let outcome = RecommendationFlow::multi(runner, catalog(), &natural_gas(), 2)
        .run()
        .await;

    assert!(outcome.result.is_malformed());
    assert_eq!(outcome.normalize(), Err(RecommendationError::CorruptOutput));
}

#[tokio::test]
async fn test_malformed_rank_output_is_corrupt() {
    let runner = ScriptedRunner::new(vec![
        Ok(StageOutput::from_json(json!({"recommendations": [record("a")]}))),
        Ok(StageOutput::from_raw("Sure! Here are the top picks: heat pumps")),
    ]);

    let outcome = RecommendationFlow::multi(runner, catalog(), &natural_gas(), 1)
        .run()
        .await;

    assert_eq!(outcome.stages_run.len(), 2);
    assert_eq!(outcome.normalize(), Err(RecommendationError::CorruptOutput));
}

// ============================================================================
// Rank selection limits
// ============================================================================

fn three_records() -> StageOutput {
    StageOutput::from_json(json!({
        "recommendations": [record("A"), record("B"), record("C")]
    }))
}

#[tokio::test]
async fn test_rank_output_drops_history_and_caps_target() {
    let runner = ScriptedRunner::new(vec![Ok(three_records()), Ok(three_records())]);

    let outcome = RecommendationFlow::single(
        runner,
        catalog(),
        ActivityRef::new("uuid-1", "Natural Gas"),
        2,
        vec!["A".to_string()],
    )
    .run()
    .await;

    let recs = outcome.normalize().unwrap();
    let texts: Vec<_> = recs.iter().map(|r| r.recommendation.as_str()).collect();
    assert_eq!(texts, vec!["B", "C"]);
}

#[tokio::test]
async fn test_rank_output_capped_for_multi() {
    let runner = ScriptedRunner::new(vec![Ok(three_records()), Ok(three_records())]);

    let outcome = RecommendationFlow::multi(runner, catalog(), &natural_gas(), 1)
        .run()
        .await;

    let recs = outcome.normalize().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].recommendation, "A");
}

#[tokio::test]
async fn test_rank_output_all_in_history_is_no_activity() {
    let runner = ScriptedRunner::new(vec![Ok(three_records()), Ok(three_records())]);

    let outcome = RecommendationFlow::single(
        runner,
        catalog(),
        ActivityRef::new("uuid-1", "Natural Gas"),
        5,
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
    )
    .run()
    .await;

    assert_eq!(outcome.normalize(), Err(RecommendationError::NoActivity));
}

// ============================================================================
// Inputs and token accounting
// ============================================================================

#[tokio::test]
async fn test_single_flow_passes_history() {
    let runner = ScriptedRunner::new(vec![Ok(StageOutput::from_raw("false"))]);
    let history = vec!["Replace diesel generators with solar PV".to_string()];

    RecommendationFlow::single(
        runner.clone(),
        catalog(),
        ActivityRef::new("uuid-2", "Diesel"),
        2,
        history.clone(),
    )
    .run()
    .await;

    let calls = runner.calls();
    assert_eq!(calls[0].0, Stage::FetchCandidatesSingle);
    let inputs = &calls[0].1;
    assert_eq!(inputs.activity_ids, vec!["uuid-2".to_string()]);
    assert_eq!(inputs.activity_names, vec!["Diesel".to_string()]);
    assert_eq!(inputs.max_recommendation_amount, 2);
    assert_eq!(inputs.history, Some(history));
}

#[tokio::test]
async fn test_multi_flow_has_no_history() {
    let runner = ScriptedRunner::new(vec![Ok(StageOutput::from_raw("false"))]);
    let activities = vec![
        ActivityRef::new("uuid-1", "Natural Gas"),
        ActivityRef::new("uuid-2", "Diesel"),
    ];

    RecommendationFlow::multi(runner.clone(), catalog(), &activities, 2)
        .run()
        .await;

    let inputs = &runner.calls()[0].1;
    assert_eq!(inputs.activity_ids, vec!["uuid-1".to_string(), "uuid-2".to_string()]);
    assert_eq!(inputs.history, None);
}

#[tokio::test]
async fn test_token_usage_summed_across_stages() {
    let runner = ScriptedRunner::new(vec![
        Ok(StageOutput::from_raw("[1]").with_token_usage(usage(100))),
        Ok(StageOutput::from_raw("false").with_token_usage(usage(40))),
    ]);

    let outcome = RecommendationFlow::multi(runner, catalog(), &natural_gas(), 1)
        .run()
        .await;

    assert_eq!(outcome.total_tokens(), Some(140));
    let total = outcome.token_usage.unwrap();
    assert_eq!(total.completion_tokens, 20);
    assert_eq!(total.prompt_tokens, 120);
}

#[tokio::test]
async fn test_token_usage_absent_when_unreported() {
    let runner = ScriptedRunner::new(vec![Ok(StageOutput::from_raw("false"))]);

    let outcome = RecommendationFlow::multi(runner, catalog(), &natural_gas(), 1)
        .run()
        .await;

    assert_eq!(outcome.total_tokens(), None);
}
