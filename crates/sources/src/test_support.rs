//! Record builders shared by the unit tests of this crate.

use data_loader::{FeasibilityLevel, ImpactLevel, Recommendation, ReferenceCatalog};
use std::sync::Arc;

pub(crate) fn record(id: &str, name: &str, text: &str) -> Recommendation {
    Recommendation {
        activity_id: id.to_string(),
        activity_name: name.to_string(),
        scope: "1.1".to_string(),
        recommendation: text.to_string(),
        impact_level: ImpactLevel::Medium,
        estimated_reduction_percentage: 10.0,
        feasibility_score: 0.5,
        feasibility_level: FeasibilityLevel::Medium,
        cost: 1000.0,
        infrastructure_requirements: "None".to_string(),
        technology_status: "Mature".to_string(),
    }
}

/// Two Natural Gas and two Diesel records
pub(crate) fn catalog() -> Arc<ReferenceCatalog> {
    let mut heat_pumps = record("uuid-1", "Natural Gas", "Install heat pumps");
    heat_pumps.impact_level = ImpactLevel::High;
    let thermostats = record("uuid-1", "Natural Gas", "Install smart thermostats");

    let mut solar = record("uuid-2", "Diesel", "Replace diesel generators with solar PV");
    solar.impact_level = ImpactLevel::High;
    solar.feasibility_score = 0.65;
    let mut training = record("uuid-2", "Diesel", "Conduct staff training on eco-driving");
    training.impact_level = ImpactLevel::Low;
    training.feasibility_level = FeasibilityLevel::High;
    training.feasibility_score = 0.95;

    let mut catalog = ReferenceCatalog::new();
    for r in [heat_pumps, thermostats, solar, training] {
        catalog.insert_record(r);
    }
    Arc::new(catalog)
}
