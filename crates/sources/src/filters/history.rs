//! Filter to remove recommendations the caller has already received.

use crate::traits::Filter;
use crate::types::{Candidate, FetchContext};

/// Removes candidates whose recommendation text exactly equals an entry of
/// the request history.
///
/// ## Algorithm
/// Uses the HashSet in FetchContext.history for O(1) lookups. Matching is
/// exact: no trimming, no case folding.
pub struct HistoryFilter;

impl Filter for HistoryFilter {
    fn name(&self) -> &str {
        "HistoryFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &FetchContext) -> Vec<Candidate> {
        if context.history.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|candidate| !context.in_history(&candidate.record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_history_filter() {
        let context = FetchContext::new(vec![], vec![], 2).with_history(vec![
            "Replace diesel generators with solar PV".to_string(),
            "conduct staff training on eco-driving".to_string(),
        ]);

        let candidates = vec![
            Candidate::new(record("uuid-2", "Diesel", "Replace diesel generators with solar PV")),
            Candidate::new(record("uuid-2", "Diesel", "Conduct staff training on eco-driving")),
        ];

        let filtered = HistoryFilter.apply(candidates, &context);

        // Only the exact-text entry is removed
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered[0].record.recommendation,
            "Conduct staff training on eco-driving"
        );
    }
}
