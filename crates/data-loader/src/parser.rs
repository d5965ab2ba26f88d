//! Parser for the reference dataset file.
//!
//! Two layouts are accepted:
//! - a bare JSON array of recommendation records
//! - an object wrapping that array: `{"recommendations": [...]}`

use crate::error::{DataLoadError, Result};
use crate::types::Recommendation;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read and parse the catalog file at `path`
pub fn parse_catalog_file(path: &Path) -> Result<Vec<Recommendation>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    parse_catalog_str(&content, &path.display().to_string())
}

/// Parse catalog JSON text. `source` names the input in error messages.
pub fn parse_catalog_str(content: &str, source: &str) -> Result<Vec<Recommendation>> {
    let value: Value = serde_json::from_str(content).map_err(|e| parse_error(source, &e))?;

    let records = match value {
        Value::Array(records) => Value::Array(records),
        Value::Object(mut map) => map.remove("recommendations").ok_or_else(|| {
            shape_error(source, "object layout needs a \"recommendations\" array")
        })?,
        _ => return Err(shape_error(source, "expected an array or an object")),
    };

    serde_json::from_value(records).map_err(|e| shape_error(source, &e.to_string()))
}

fn shape_error(source: &str, reason: &str) -> DataLoadError {
    DataLoadError::ParseError {
        file: source.to_string(),
        line: 0,
        column: 0,
        reason: reason.to_string(),
    }
}

fn parse_error(source: &str, e: &serde_json::Error) -> DataLoadError {
    DataLoadError::ParseError {
        file: source.to_string(),
        line: e.line(),
        column: e.column(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeasibilityLevel, ImpactLevel};

    const RECORD: &str = r#"{
        "activityId": "uuid-2",
        "activityName": "Diesel",
        "scope": "1.1",
        "recommendation": "Replace diesel generators with solar PV",
        "impactLevel": "HIGH",
        "estimatedReductionPercentage": 40.0,
        "feasibilityScore": 0.7,
        "feasibilityLevel": "MEDIUM",
        "cost": 120000,
        "infrastructureRequirements": "Roof or ground space for PV arrays",
        "technologyStatus": "Mature"
    }"#;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_catalog_str(&format!("[{}]", RECORD), "inline").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].activity_id, "uuid-2");
        assert_eq!(records[0].impact_level, ImpactLevel::High);
        assert_eq!(records[0].feasibility_level, FeasibilityLevel::Medium);
        assert_eq!(records[0].cost, 120000.0);
    }

    #[test]
    fn test_parse_wrapped_object() {
        let text = format!(r#"{{"recommendations": [{}, {}]}}"#, RECORD, RECORD);
        let records = parse_catalog_str(&text, "inline").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = parse_catalog_str("[\n  {\"activityId\": }\n]", "broken.json").unwrap_err();
        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "broken.json");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_level_is_rejected() {
        let text = format!("[{}]", RECORD.replace("\"HIGH\"", "\"EXTREME\""));
        let err = parse_catalog_str(&text, "inline").unwrap_err();
        assert!(err.to_string().contains("EXTREME"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_catalog_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
