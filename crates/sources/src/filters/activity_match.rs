//! Filter to keep only records belonging to the requested activities.

use crate::traits::Filter;
use crate::types::{Candidate, FetchContext};

/// Keeps candidates whose activity id was requested, or whose activity name
/// matches a requested name (ignoring case and surrounding whitespace).
///
/// An id and a name from the same request are matched independently, so a
/// caller that sends a stale id with a correct name still gets matches.
pub struct ActivityMatchFilter;

impl Filter for ActivityMatchFilter {
    fn name(&self) -> &str {
        "ActivityMatchFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &FetchContext) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| context.matches_activity(&candidate.record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_matches_by_id_or_name() {
        let context = FetchContext::new(
            vec!["uuid-1".to_string()],
            vec!["  DIESEL ".to_string()],
            2,
        );

        let candidates = vec![
            Candidate::new(record("uuid-1", "Natural Gas", "Install heat pumps")),
            Candidate::new(record("uuid-2", "Diesel", "Switch to HVO")),
            Candidate::new(record("uuid-4", "Refrigerants", "Low-GWP refrigerants")),
        ];

        let filtered = ActivityMatchFilter.apply(candidates, &context);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].record.activity_id, "uuid-1");
        assert_eq!(filtered[1].record.activity_id, "uuid-2");
    }

    #[test]
    fn test_unknown_activities_match_nothing() {
        let context = FetchContext::new(
            vec!["uuid-929".to_string(), "uuid-888".to_string()],
            vec!["Silver".to_string(), "Coal".to_string()],
            2,
        );

        let candidates = vec![
            Candidate::new(record("uuid-1", "Natural Gas", "Install heat pumps")),
            Candidate::new(record("uuid-2", "Diesel", "Switch to HVO")),
        ];

        assert!(ActivityMatchFilter.apply(candidates, &context).is_empty());
    }
}
