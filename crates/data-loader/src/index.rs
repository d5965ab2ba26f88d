//! ReferenceCatalog building and indexing logic.
//!
//! Loading happens once at start-up:
//! - parse the catalog file
//! - validate every record (in parallel)
//! - build the id/name lookup indices
//! - compute per-activity statistics (in parallel)

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

impl ReferenceCatalog {
    /// Load the reference dataset from a JSON file.
    ///
    /// This is the main entry point for loading data.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading reference catalog from {:?}", path);

        let records = parser::parse_catalog_file(path)?;
        let catalog = Self::from_records(records)?;

        let (activities, records) = catalog.counts();
        info!(
            "Reference catalog loaded: {} activities, {} recommendation records",
            activities, records
        );
        Ok(catalog)
    }

    /// Build a validated, indexed catalog from already-parsed records
    pub fn from_records(records: Vec<Recommendation>) -> Result<Self> {
        validate_records(&records)?;

        let mut catalog = ReferenceCatalog::new();
        for record in records {
            catalog.insert_record(record);
        }
        catalog.compute_activity_stats();
        Ok(catalog)
    }

    /// Compute aggregate statistics for every activity
    pub fn compute_activity_stats(&mut self) {
        let records = &self.records;
        self.activity_stats = self
            .id_index
            .par_iter()
            .map(|(activity_id, positions)| {
                let count = positions.len() as u32;
                let total_reduction: f64 = positions
                    .iter()
                    .map(|&p| records[p].estimated_reduction_percentage)
                    .sum();
                let best_feasibility_score = positions
                    .iter()
                    .map(|&p| records[p].feasibility_score)
                    .fold(0.0_f64, f64::max);

                (
                    activity_id.clone(),
                    ActivityStats {
                        recommendation_count: count,
                        avg_reduction_percentage: if count > 0 {
                            total_reduction / count as f64
                        } else {
                            0.0
                        },
                        best_feasibility_score,
                    },
                )
            })
            .collect::<HashMap<_, _>>();
    }
}

/// Validate record integrity.
///
/// Checks that:
/// - identifiers, names and recommendation text are non-empty
/// - estimatedReductionPercentage lies in [0, 100]
/// - feasibilityScore and cost are non-negative
///
/// Reports the first offending record in file order.
pub fn validate_records(records: &[Recommendation]) -> Result<()> {
    let first_error = records
        .par_iter()
        .enumerate()
        .filter_map(|(position, record)| check_record(position, record).err())
        .min_by_key(|e| match e {
            DataLoadError::InvalidValue { record, .. } => *record,
            _ => usize::MAX,
        });

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn check_record(position: usize, record: &Recommendation) -> Result<()> {
    let invalid = |field: &str, value: String| DataLoadError::InvalidValue {
        field: field.to_string(),
        record: position,
        value,
    };

    if record.activity_id.trim().is_empty() {
        return Err(invalid("activityId", format!("{:?}", record.activity_id)));
    }
    if record.activity_name.trim().is_empty() {
        return Err(invalid("activityName", format!("{:?}", record.activity_name)));
    }
    if record.recommendation.trim().is_empty() {
        return Err(invalid("recommendation", format!("{:?}", record.recommendation)));
    }
    if !(0.0..=100.0).contains(&record.estimated_reduction_percentage) {
        return Err(invalid(
            "estimatedReductionPercentage",
            record.estimated_reduction_percentage.to_string(),
        ));
    }
    if !(record.feasibility_score >= 0.0) {
        return Err(invalid("feasibilityScore", record.feasibility_score.to_string()));
    }
    if !(record.cost >= 0.0) {
        return Err(invalid("cost", record.cost.to_string()));
    }
    Ok(())
}
