//! Candidate and fetch-context types shared by the catalog agent.

use agent_client::StageInputs;
use data_loader::{Recommendation, normalize_name};
use std::collections::HashSet;

/// A recommendation record moving through the fetch/rank stages
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub record: Recommendation,
    /// Rank score; 0.0 until the ranker has scored the candidate
    pub score: f64,
}

impl Candidate {
    pub fn new(record: Recommendation) -> Self {
        Self { record, score: 0.0 }
    }
}

/// Everything the filters need to know about one request.
///
/// Built once per stage invocation; all lookups are O(1).
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    pub activity_ids: HashSet<String>,
    /// Requested activity names, normalised with [`normalize_name`]
    pub activity_names: HashSet<String>,
    /// Previously issued recommendation texts, matched exactly
    pub history: HashSet<String>,
    pub target_count: usize,
}

impl FetchContext {
    pub fn new<I, N>(activity_ids: I, activity_names: N, target_count: usize) -> Self
    where
        I: IntoIterator<Item = String>,
        N: IntoIterator<Item = String>,
    {
        Self {
            activity_ids: activity_ids.into_iter().collect(),
            activity_names: activity_names.into_iter().map(|n| normalize_name(&n)).collect(),
            history: HashSet::new(),
            target_count,
        }
    }

    pub fn with_history<H: IntoIterator<Item = String>>(mut self, history: H) -> Self {
        self.history = history.into_iter().collect();
        self
    }

    pub fn from_inputs(inputs: &StageInputs) -> Self {
        Self::new(
            inputs.activity_ids.iter().cloned(),
            inputs.activity_names.iter().cloned(),
            inputs.max_recommendation_amount as usize,
        )
        .with_history(inputs.history.iter().flatten().cloned())
    }

    pub fn matches_activity(&self, record: &Recommendation) -> bool {
        self.activity_ids.contains(&record.activity_id)
            || self.activity_names.contains(&normalize_name(&record.activity_name))
    }

    pub fn in_history(&self, record: &Recommendation) -> bool {
        self.history.contains(&record.recommendation)
    }
}
