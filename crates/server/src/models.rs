//! Request and response bodies of the HTTP API.
//!
//! Field names are camelCase on the wire. Amounts are `NonZeroU32`, so a
//! zero or negative amount is rejected while the body is deserialized.

use std::num::NonZeroU32;

use data_loader::{ActivityRef, Recommendation};
use pipeline::{ErrorDetail, RecommendationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiActivityRequest {
    pub scope: String,
    pub scope_name: String,
    pub max_recommendation_amount: NonZeroU32,
    pub activities: Vec<ActivityRef>,
    pub organization_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleActivityRequest {
    pub scope: String,
    pub scope_name: String,
    pub recommendation_amount: NonZeroU32,
    pub activity_id: String,
    pub activity_name: String,
    pub organization_id: String,
    #[serde(default)]
    pub recommendation_history: Vec<String>,
}

impl SingleActivityRequest {
    pub fn activity(&self) -> ActivityRef {
        ActivityRef::new(self.activity_id.clone(), self.activity_name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    /// Total tokens over every stage that ran; `null` if none was reported
    pub token_usage: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

impl From<RecommendationError> for ErrorResponse {
    fn from(err: RecommendationError) -> Self {
        Self { error: err.detail() }
    }
}
