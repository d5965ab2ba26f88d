//! Recommendation pipeline: stage orchestration and output normalization.
//!
//! This crate provides:
//! - [`AgentResult`]: one-time classification of a stage's raw output
//! - [`has_candidates`]: the gate deciding whether the rank stage runs
//! - [`normalize`]: extraction of the canonical recommendation list
//! - [`RecommendationFlow`]: the FETCH → RANK → TERMINAL state machine
//!
//! ## Architecture
//! The flow processes a request in stages:
//! 1. The fetch stage collects candidates for the requested activities
//! 2. The gate inspects them; with no candidates the flow stops here
//! 3. The rank stage selects the final set from the fetched candidates
//! 4. The terminal result is normalized into records or a
//!    [`RecommendationError`]
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::RecommendationFlow;
//!
//! let outcome = RecommendationFlow::multi(runner, catalog, &activities, 2)
//!     .run()
//!     .await;
//! let recommendations = outcome.normalize()?;
//! ```

pub mod agent_result;
pub mod error;
pub mod flow;
pub mod gate;
pub mod normalizer;

// Re-export main types
pub use agent_result::AgentResult;
pub use error::{ERR_NO_ACTIVITY, ErrorDetail, RecommendationError, Result};
pub use flow::{FlowOutcome, FlowState, FlowVariant, RecommendationFlow};
pub use gate::has_candidates;
pub use normalizer::{normalize, normalize_output};
