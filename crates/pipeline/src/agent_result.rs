//! Classification of raw stage output.
//!
//! A stage can hand back an already-parsed object, JSON text, the `false`
//! sentinel, or garbage. The shape is decided once here; the gate and the
//! normalizer only ever look at an [`AgentResult`].

use agent_client::StageOutput;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum AgentResult {
    /// Valid JSON of any shape other than the sentinel
    Parsed(Value),
    /// The agent said `false` (boolean or string), or a bare boolean
    Sentinel(bool),
    /// Unparseable output or a failed invocation; carries the reason
    Malformed(String),
}

impl AgentResult {
    pub fn classify(output: &StageOutput) -> Self {
        let value = match &output.json {
            Some(json) => json.clone(),
            None => match serde_json::from_str::<Value>(output.raw.trim()) {
                Ok(value) => value,
                // `False`, ` FALSE ` and friends are not JSON but still the sentinel
                Err(_) if is_false_literal(&output.raw) => return AgentResult::Sentinel(false),
                Err(e) => {
                    debug!("Stage output is not JSON: {}", e);
                    return AgentResult::Malformed(e.to_string());
                }
            },
        };

        match value {
            Value::Bool(flag) => AgentResult::Sentinel(flag),
            Value::String(text) if is_false_literal(&text) => AgentResult::Sentinel(false),
            other => AgentResult::Parsed(other),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AgentResult::Malformed(_))
    }
}

impl From<&StageOutput> for AgentResult {
    fn from(output: &StageOutput) -> Self {
        AgentResult::classify(output)
    }
}

fn is_false_literal(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_form_wins_over_raw() {
        let output = StageOutput {
            raw: "not json at all".to_string(),
            json: Some(json!({"recommendations": []})),
            token_usage: None,
        };
        assert_eq!(
            AgentResult::classify(&output),
            AgentResult::Parsed(json!({"recommendations": []}))
        );
    }

    #[test]
    fn test_raw_json_text_is_parsed() {
        let output = StageOutput::from_raw(r#"  {"recommendations": [1]}  "#);
        assert_eq!(
            AgentResult::classify(&output),
            AgentResult::Parsed(json!({"recommendations": [1]}))
        );
    }

    #[test]
    fn test_false_sentinel_variants() {
        for raw in ["false", "False", "  FALSE\n", "\"false\"", "\" False \""] {
            let result = AgentResult::classify(&StageOutput::from_raw(raw));
            assert_eq!(result, AgentResult::Sentinel(false), "raw = {:?}", raw);
        }
        let result = AgentResult::classify(&StageOutput::from_json(json!(false)));
        assert_eq!(result, AgentResult::Sentinel(false));
    }

    #[test]
    fn test_true_is_a_sentinel_too() {
        let result = AgentResult::classify(&StageOutput::from_raw("true"));
        assert_eq!(result, AgentResult::Sentinel(true));
    }

    #[test]
    fn test_other_strings_stay_parsed() {
        let result = AgentResult::classify(&StageOutput::from_raw("\"nothing here\""));
        assert_eq!(result, AgentResult::Parsed(json!("nothing here")));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = AgentResult::classify(&StageOutput::from_raw("Here are your results: {"));
        assert!(result.is_malformed());
        assert!(AgentResult::classify(&StageOutput::from_raw("")).is_malformed());
    }
}
