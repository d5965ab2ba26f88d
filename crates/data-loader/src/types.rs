//! Core domain types for the reference dataset.
//!
//! Every record in the dataset, and every record returned to a caller,
//! has the same shape: a [`Recommendation`] tied to one activity.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque identifier of an activity (e.g. "uuid-2"). Supplied by callers and
/// never checked against a registry at this layer.
pub type ActivityId = String;

// =============================================================================
// Activity Types
// =============================================================================

/// A candidate subject for recommendation, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRef {
    pub id: ActivityId,
    pub name: String,
}

impl ActivityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Expected emission impact of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// How realistic a recommendation is to implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeasibilityLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    /// Ordinal weight used for ranking (HIGH = 3, LOW = 1).
    pub fn weight(self) -> u32 {
        match self {
            ImpactLevel::High => 3,
            ImpactLevel::Medium => 2,
            ImpactLevel::Low => 1,
        }
    }
}

impl FeasibilityLevel {
    /// Ordinal weight used for ranking (HIGH = 3, LOW = 1).
    pub fn weight(self) -> u32 {
        match self {
            FeasibilityLevel::High => 3,
            FeasibilityLevel::Medium => 2,
            FeasibilityLevel::Low => 1,
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImpactLevel::High => "HIGH",
            ImpactLevel::Medium => "MEDIUM",
            ImpactLevel::Low => "LOW",
        };
        f.write_str(s)
    }
}

impl fmt::Display for FeasibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeasibilityLevel::High => "HIGH",
            FeasibilityLevel::Medium => "MEDIUM",
            FeasibilityLevel::Low => "LOW",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Recommendation Record
// =============================================================================

/// The canonical recommendation record.
///
/// Field names follow the public JSON contract (camelCase). A record is only
/// valid when every field is present and correctly typed, which serde
/// enforces on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub activity_id: ActivityId,
    pub activity_name: String,
    pub scope: String,
    pub recommendation: String,
    pub impact_level: ImpactLevel,
    pub estimated_reduction_percentage: f64,
    pub feasibility_score: f64,
    pub feasibility_level: FeasibilityLevel,
    pub cost: f64,
    pub infrastructure_requirements: String,
    pub technology_status: String,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed per-activity statistics, built once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub recommendation_count: u32,
    pub avg_reduction_percentage: f64,
    pub best_feasibility_score: f64,
}

// =============================================================================
// ReferenceCatalog - the read-only reference dataset
// =============================================================================

/// The static catalog of known activities and their recommendations.
///
/// Loaded once at process start, wrapped in an `Arc` and never mutated
/// afterwards. Indices hold positions into `records`.
#[derive(Debug)]
pub struct ReferenceCatalog {
    pub(crate) records: Vec<Recommendation>,

    /// Record positions keyed by activity id
    pub(crate) id_index: HashMap<ActivityId, Vec<usize>>,
    /// Record positions keyed by normalised activity name
    pub(crate) name_index: HashMap<String, Vec<usize>>,

    pub(crate) activity_stats: HashMap<ActivityId, ActivityStats>,
}

impl ReferenceCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            id_index: HashMap::new(),
            name_index: HashMap::new(),
            activity_stats: HashMap::new(),
        }
    }

    /// All records in load order
    pub fn records(&self) -> &[Recommendation] {
        &self.records
    }

    /// Records whose activity id is in `ids` or whose activity name matches
    /// one of `names` (ignoring case and surrounding whitespace), in load
    /// order and without duplicates
    pub fn records_for_activities(&self, ids: &[String], names: &[String]) -> Vec<&Recommendation> {
        let by_id = ids.iter().filter_map(|id| self.id_index.get(id));
        let by_name = names
            .iter()
            .filter_map(|name| self.name_index.get(&normalize_name(name)));

        let mut positions: Vec<usize> = by_id.chain(by_name).flatten().copied().collect();
        positions.sort_unstable();
        positions.dedup();
        positions.into_iter().map(|p| &self.records[p]).collect()
    }

    pub fn get_activity_stats(&self, id: &str) -> Option<&ActivityStats> {
        self.activity_stats.get(id)
    }

    /// Distinct activities, sorted by id
    pub fn activities(&self) -> Vec<ActivityRef> {
        let mut activities: Vec<ActivityRef> = self
            .id_index
            .iter()
            .filter_map(|(id, positions)| {
                let first = positions.first()?;
                Some(ActivityRef::new(id.clone(), self.records[*first].activity_name.clone()))
            })
            .collect();
        activities.sort_by(|a, b| a.id.cmp(&b.id));
        activities
    }

    /// Insert a record and update the lookup indices
    pub fn insert_record(&mut self, record: Recommendation) {
        let position = self.records.len();
        self.id_index
            .entry(record.activity_id.clone())
            .or_default()
            .push(position);
        self.name_index
            .entry(normalize_name(&record.activity_name))
            .or_default()
            .push(position);
        self.records.push(record);
    }

    /// (activities, records)
    pub fn counts(&self) -> (usize, usize) {
        (self.id_index.len(), self.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// The catalog travels to the agent pipeline as its plain record list.
impl Serialize for ReferenceCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

/// Lowercase and trim an activity name for lookups.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
