//! Filter implementations for the catalog agent.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod activity_match;
pub mod history;

// Re-export for convenience
pub use activity_match::ActivityMatchFilter;
pub use history::HistoryFilter;
