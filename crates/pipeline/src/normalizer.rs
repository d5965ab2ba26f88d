//! Output normalizer: turns the terminal stage result into the canonical
//! recommendation list or an error.
//!
//! Pure; the same [`AgentResult`] always normalizes to the same outcome.

use crate::agent_result::AgentResult;
use crate::error::{RecommendationError, Result};
use agent_client::StageOutput;
use data_loader::Recommendation;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Extract the recommendation list from a classified stage result.
///
/// ## Decision order
/// 1. Malformed output → [`RecommendationError::CorruptOutput`]
/// 2. Sentinel → [`RecommendationError::NoActivity`]
/// 3. Mapping with a `recommendations` sequence: empty →
///    [`RecommendationError::NoActivity`], otherwise the records in order
/// 4. Any other shape → [`RecommendationError::NoActivity`]
///
/// Records that do not deserialize into [`Recommendation`] make the whole
/// output corrupt.
pub fn normalize(result: &AgentResult) -> Result<Vec<Recommendation>> {
    let value = match result {
        AgentResult::Malformed(reason) => {
            warn!("Agent output is corrupt: {}", reason);
            return Err(RecommendationError::CorruptOutput);
        }
        AgentResult::Sentinel(_) => return Err(RecommendationError::NoActivity),
        AgentResult::Parsed(value) => value,
    };

    let items = match value.get("recommendations") {
        Some(Value::Array(items)) => items,
        _ => {
            debug!("Agent output has no recommendations sequence");
            return Err(RecommendationError::NoActivity);
        }
    };

    if items.is_empty() {
        return Err(RecommendationError::NoActivity);
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Recommendation::deserialize(item).map_err(|e| {
                warn!("Recommendation {} does not match the record schema: {}", i, e);
                RecommendationError::CorruptOutput
            })
        })
        .collect()
}

/// Classify then normalize a raw stage output.
pub fn normalize_output(output: &StageOutput) -> Result<Vec<Recommendation>> {
    normalize(&AgentResult::classify(output))
}
