//! Pipeline gate: decides whether the rank stage runs at all.
//!
//! Fails closed. Anything that is not a recognisable, non-empty candidate
//! list keeps the rank stage from running.

use crate::agent_result::AgentResult;
use serde_json::Value;

/// `true` iff the fetch stage produced at least one candidate.
///
/// - sentinel (either boolean) → `false`
/// - bare sequence → non-empty
/// - mapping with a `recommendations` sequence → that sequence is non-empty
/// - anything else, including malformed output → `false`
pub fn has_candidates(result: &AgentResult) -> bool {
    match result {
        AgentResult::Parsed(Value::Array(items)) => !items.is_empty(),
        AgentResult::Parsed(Value::Object(map)) => map
            .get("recommendations")
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty()),
        AgentResult::Parsed(_) | AgentResult::Sentinel(_) | AgentResult::Malformed(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_client::StageOutput;
    use serde_json::json;

    fn gate(raw: &str) -> bool {
        has_candidates(&AgentResult::classify(&StageOutput::from_raw(raw)))
    }

    #[test]
    fn test_sentinel_closes_gate() {
        assert!(!gate("false"));
        assert!(!gate(" FALSE "));
        assert!(!gate("\"false\""));
        assert!(!gate("true"));
    }

    #[test]
    fn test_bare_sequence() {
        assert!(gate("[{\"recommendation\": \"x\"}]"));
        assert!(!gate("[]"));
    }

    #[test]
    fn test_recommendations_mapping() {
        assert!(gate(r#"{"recommendations": [{"recommendation": "x"}]}"#));
        assert!(!gate(r#"{"recommendations": []}"#));
        assert!(!gate(r#"{"recommendations": "lots"}"#));
        assert!(!gate(r#"{"candidates": [1, 2]}"#));
    }

    #[test]
    fn test_scalars_and_garbage_close_gate() {
        assert!(!gate("42"));
        assert!(!gate("null"));
        assert!(!gate("\"some text\""));
        assert!(!gate("{not json"));
    }

    #[test]
    fn test_structured_form() {
        let output = StageOutput::from_json(json!({"recommendations": [1]}));
        assert!(has_candidates(&AgentResult::classify(&output)));
    }
}
