//! Impact ranker - orders candidates the way the ranker agent is told to.
//!
//! ## Algorithm
//! 1. Score = impactLevel weight × 10 + feasibilityLevel weight
//!    (HIGH = 3, MEDIUM = 2, LOW = 1), so impact always dominates
//! 2. Sort by score DESC, then feasibilityScore DESC, then
//!    estimatedReductionPercentage DESC
//! 3. Take the top N

use crate::types::Candidate;
use data_loader::Recommendation;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactRanker;

impl ImpactRanker {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, record: &Recommendation) -> f64 {
        (record.impact_level.weight() * 10 + record.feasibility_level.weight()) as f64
    }

    /// Score, sort and truncate. Ties keep their input order.
    pub fn rank_and_select(&self, candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
        let mut scored: Vec<Candidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                candidate.score = self.score(&candidate.record);
                candidate
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.record
                        .feasibility_score
                        .partial_cmp(&a.record.feasibility_score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| {
                    b.record
                        .estimated_reduction_percentage
                        .partial_cmp(&a.record.estimated_reduction_percentage)
                        .unwrap_or(Ordering::Equal)
                })
        });

        let before = scored.len();
        scored.truncate(limit);
        debug!("Ranked {} candidates, selected {}", before, scored.len());
        scored
    }
}
