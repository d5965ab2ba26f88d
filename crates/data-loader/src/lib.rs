//! # Data Loader Crate
//!
//! This crate holds the recommendation domain records and loads the static
//! reference dataset that grounds every recommendation.
//!
//! ## Main Components
//!
//! - **types**: Domain types (ActivityRef, Recommendation, levels, ReferenceCatalog)
//! - **parser**: Parse the catalog JSON file into records
//! - **index**: Validate records, build lookup indices and statistics
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::ReferenceCatalog;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ReferenceCatalog::load_from_file(Path::new("data/reference_catalog.json"))?);
//!
//! let ids = vec!["uuid-2".to_string()];
//! for record in catalog.records_for_activities(&ids, &[]) {
//!     println!("{}: {}", record.activity_name, record.recommendation);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::validate_records;
pub use types::{
    ActivityId,
    ActivityRef,
    ActivityStats,
    FeasibilityLevel,
    ImpactLevel,
    Recommendation,
    ReferenceCatalog,
    normalize_name,
};
