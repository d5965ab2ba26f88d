//! # Sources Crate
//!
//! Candidate generation for the recommendation stages, run directly against
//! the reference dataset.
//!
//! ## Components
//!
//! ### Filters
//! - [`ActivityMatchFilter`]: keeps records of the requested activities
//!   (by id, or by case-insensitive name)
//! - [`HistoryFilter`]: drops recommendations the caller already received
//!
//! ### Ranker
//! [`ImpactRanker`] scores candidates by impact first and feasibility second.
//!
//! ### Catalog agent
//! [`CatalogAgent`] implements `StageRunner`, so the pipeline can run end to
//! end without an LLM service:
//!
//! ```ignore
//! use agent_client::{Stage, StageInputs, StageRunner};
//! use sources::CatalogAgent;
//!
//! let agent = CatalogAgent::new();
//! let output = agent.invoke(Stage::FetchCandidatesMulti, &inputs).await?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod ranker;
pub mod runner;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use filter_pipeline::FilterPipeline;
pub use filters::{ActivityMatchFilter, HistoryFilter};
pub use ranker::ImpactRanker;
pub use runner::CatalogAgent;
pub use traits::Filter;
pub use types::{Candidate, FetchContext};
