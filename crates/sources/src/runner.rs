//! Catalog agent - runs the fetch and rank stages directly against the
//! reference dataset, without a language model.
//!
//! It answers in the same shapes the LLM agents are asked for: the bare
//! word `false` when nothing matches, otherwise
//! `{"recommendations": [...]}`.

use agent_client::{AgentClientError, Result, Stage, StageInputs, StageOutput, StageRunner};
use async_trait::async_trait;
use data_loader::Recommendation;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{ActivityMatchFilter, HistoryFilter};
use crate::ranker::ImpactRanker;
use crate::types::{Candidate, FetchContext};

#[derive(Serialize, Deserialize)]
struct RecommendationList {
    recommendations: Vec<Recommendation>,
}

/// Deterministic [`StageRunner`] backed by the reference dataset.
pub struct CatalogAgent {
    fetch_multi: FilterPipeline,
    fetch_single: FilterPipeline,
    rank: FilterPipeline,
    ranker: ImpactRanker,
}

impl CatalogAgent {
    pub fn new() -> Self {
        Self {
            fetch_multi: FilterPipeline::new().add_filter(ActivityMatchFilter),
            fetch_single: FilterPipeline::new()
                .add_filter(ActivityMatchFilter)
                .add_filter(HistoryFilter),
            rank: FilterPipeline::new().add_filter(HistoryFilter),
            ranker: ImpactRanker::new(),
        }
    }

    /// Candidates for the requested activities, in catalog order.
    ///
    /// Records are looked up through the catalog's id and name indices,
    /// then run through the stage's filters.
    pub fn fetch_candidates(&self, stage: Stage, inputs: &StageInputs) -> Vec<Candidate> {
        let context = FetchContext::from_inputs(inputs);
        let pipeline = match stage {
            Stage::FetchCandidatesSingle => &self.fetch_single,
            _ => &self.fetch_multi,
        };

        let candidates = inputs
            .all_records
            .records_for_activities(&inputs.activity_ids, &inputs.activity_names)
            .into_iter()
            .cloned()
            .map(Candidate::new)
            .collect();
        pipeline.apply(candidates, &context)
    }

    /// Rank the candidates carried in `inputs.context` and keep the top N
    pub fn rank_candidates(&self, inputs: &StageInputs) -> Result<Vec<Candidate>> {
        let context = inputs.context.as_deref().ok_or_else(|| {
            AgentClientError::InvalidResponse("rank stage needs candidates in context".to_string())
        })?;
        let list: RecommendationList = serde_json::from_str(context)?;

        let fetch_context = FetchContext::from_inputs(inputs);
        let candidates = list.recommendations.into_iter().map(Candidate::new).collect();
        let candidates = self.rank.apply(candidates, &fetch_context);

        Ok(self
            .ranker
            .rank_and_select(candidates, fetch_context.target_count))
    }

    fn render(candidates: Vec<Candidate>) -> Result<StageOutput> {
        if candidates.is_empty() {
            return Ok(StageOutput::from_raw("false"));
        }
        let list = RecommendationList {
            recommendations: candidates.into_iter().map(|c| c.record).collect(),
        };
        Ok(StageOutput::from_json(serde_json::to_value(list)?))
    }
}

impl Default for CatalogAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StageRunner for CatalogAgent {
    fn name(&self) -> &str {
        "catalog"
    }

    #[instrument(skip(self, inputs), fields(stage = stage.name()))]
    async fn invoke(&self, stage: Stage, inputs: &StageInputs) -> Result<StageOutput> {
        let candidates = match stage {
            Stage::FetchCandidatesMulti | Stage::FetchCandidatesSingle => {
                self.fetch_candidates(stage, inputs)
            }
            Stage::RankAndSelect => self.rank_candidates(inputs)?,
        };
        debug!("Catalog agent produced {} records for {}", candidates.len(), stage);
        Self::render(candidates)
    }
}
