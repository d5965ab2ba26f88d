//! Error taxonomy of the recommendation pipeline.
//!
//! Every failure collapses into one caller-visible code; only the message
//! tells a corrupt agent output apart from an empty result.

use serde::Serialize;
use thiserror::Error;

/// The one error code exposed to callers
pub const ERR_NO_ACTIVITY: &str = "ERR_NO_ACTIVITY";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationError {
    /// Explicit `false` sentinel, empty list, or an unrecognised shape
    #[error("No activity found for analysis.")]
    NoActivity,

    /// Agent output could not be parsed, or its records did not deserialize
    #[error("Crew returned non-dict or corrupt output")]
    CorruptOutput,
}

impl RecommendationError {
    pub fn code(&self) -> &'static str {
        ERR_NO_ACTIVITY
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// `{"code": ..., "message": ...}` as found under the `error` key of an
/// error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, RecommendationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct_but_code_is_shared() {
        let empty = RecommendationError::NoActivity;
        let corrupt = RecommendationError::CorruptOutput;

        assert_eq!(empty.code(), "ERR_NO_ACTIVITY");
        assert_eq!(corrupt.code(), "ERR_NO_ACTIVITY");
        assert_eq!(empty.to_string(), "No activity found for analysis.");
        assert_eq!(corrupt.to_string(), "Crew returned non-dict or corrupt output");
    }

    #[test]
    fn test_detail_serialization() {
        let json = serde_json::to_value(RecommendationError::NoActivity.detail()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "ERR_NO_ACTIVITY",
                "message": "No activity found for analysis."
            })
        );
    }
}
