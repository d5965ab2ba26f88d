//! # Recommendation Service
//!
//! Turns a validated request into a flow run and the flow's outcome into
//! one of the two response shapes. Holds only read-only shared state; every
//! call builds its own [`RecommendationFlow`].

use std::sync::Arc;

use agent_client::StageRunner;
use data_loader::ReferenceCatalog;
use pipeline::{FlowOutcome, RecommendationError, RecommendationFlow};
use tracing::{info, warn};

use crate::models::{MultiActivityRequest, RecommendationResponse, SingleActivityRequest};

#[derive(Clone)]
pub struct RecommendationService {
    runner: Arc<dyn StageRunner>,
    catalog: Arc<ReferenceCatalog>,
}

impl RecommendationService {
    pub fn new(runner: Arc<dyn StageRunner>, catalog: Arc<ReferenceCatalog>) -> Self {
        Self { runner, catalog }
    }

    pub async fn multi_activity(
        &self,
        request: &MultiActivityRequest,
    ) -> Result<RecommendationResponse, RecommendationError> {
        info!(
            "Multi-activity request for organization {} ({} activities, scope {})",
            request.organization_id,
            request.activities.len(),
            request.scope
        );

        let outcome = RecommendationFlow::multi(
            self.runner.clone(),
            self.catalog.clone(),
            &request.activities,
            request.max_recommendation_amount.get(),
        )
        .run()
        .await;

        Self::respond(outcome)
    }

    pub async fn single_activity(
        &self,
        request: &SingleActivityRequest,
    ) -> Result<RecommendationResponse, RecommendationError> {
        info!(
            "Single-activity request for organization {} (activity {}, {} in history)",
            request.organization_id,
            request.activity_id,
            request.recommendation_history.len()
        );

        let outcome = RecommendationFlow::single(
            self.runner.clone(),
            self.catalog.clone(),
            request.activity(),
            request.recommendation_amount.get(),
            request.recommendation_history.clone(),
        )
        .run()
        .await;

        Self::respond(outcome)
    }

    fn respond(outcome: FlowOutcome) -> Result<RecommendationResponse, RecommendationError> {
        let recommendations = outcome.normalize()?;

        // normalize() never returns an empty list; keep the check so a
        // broken contract still yields the documented error
        if recommendations.is_empty() {
            warn!("Normalizer returned an empty recommendation list");
            return Err(RecommendationError::NoActivity);
        }

        info!("Returning {} recommendations", recommendations.len());
        Ok(RecommendationResponse {
            recommendations,
            token_usage: outcome.total_tokens(),
        })
    }
}
