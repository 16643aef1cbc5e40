//! Trait data loading
//!
//! The trait data file is a JSON array of layer records. Decoding is
//! lenient by default: a bad record is skipped with a warning and a bad
//! field is coerced with a warning. Strict mode turns every warning into a
//! load failure.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::{RawRecordJson, RawTraitRecord, Warning};

/// Error type for trait data loading
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// File I/O error
    #[error("Unable to read trait data: {0}")]
    Io(#[from] std::io::Error),
    /// Input is not valid JSON
    #[error("Unable to parse trait data: {0}")]
    Json(#[from] serde_json::Error),
    /// Top-level value is not an array
    #[error("Trait data must be a JSON array of records, found {0}")]
    NotAnArray(&'static str),
    /// Strict mode rejected the data
    #[error("Trait data failed strict validation:\n{}", .0.iter().map(|w| format!("  - {}", w)).collect::<Vec<_>>().join("\n"))]
    Strict(Vec<Warning>),
}

/// Decoded trait data plus any lenient-mode warnings.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub records: Vec<RawTraitRecord>,
    pub warnings: Vec<Warning>,
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Decode an already-parsed JSON value.
pub fn decode_value(value: serde_json::Value, strict: bool) -> Result<LoadResult, LoadError> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => return Err(LoadError::NotAnArray(json_kind(&other))),
    };

    let mut result = LoadResult::default();
    for (index, item) in items.into_iter().enumerate() {
        let raw: RawRecordJson = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                result.warnings.push(Warning { message: e.to_string(), record: index });
                continue;
            }
        };
        match RawTraitRecord::from_json(raw) {
            Ok((record, problems)) => {
                result
                    .warnings
                    .extend(problems.into_iter().map(|message| Warning { message, record: index }));
                result.records.push(record);
            }
            Err(message) => result.warnings.push(Warning { message, record: index }),
        }
    }

    for warning in &result.warnings {
        log::warn!("{}", warning);
    }

    if strict && !result.warnings.is_empty() {
        return Err(LoadError::Strict(result.warnings));
    }
    Ok(result)
}

/// Decode trait data from a JSON string.
pub fn decode_str(content: &str, strict: bool) -> Result<LoadResult, LoadError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    decode_value(value, strict)
}

/// Read and decode a trait data file. The file is read fresh on every call.
pub fn load_trait_data(path: &Path, strict: bool) -> Result<LoadResult, LoadError> {
    let content = fs::read_to_string(path)?;
    let result = decode_str(&content, strict)?;
    log::debug!("loaded {} trait records from {}", result.records.len(), path.display());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r##"[
        {"sprite_id": "lady_007", "category": "Eyes", "variant_hint": "almond",
         "color_hex": "#112233", "color_name": "navy", "coverage_pct": "2.08",
         "notes": "", "pixel_mask": "8,0;8,1"},
        {"sprite_id": "lady_007", "category": "Background", "variant_hint": "teal",
         "color_hex": "#008080", "color_name": "teal", "coverage_pct": 50,
         "pixel_mask": "0,0"}
    ]"##;

    #[test]
    fn test_decode_sample() {
        let result = decode_str(SAMPLE, false).unwrap();
        assert_eq!(result.records.len(), 2);
        assert!(result.warnings.is_empty());
        assert_eq!(result.records[0].coverage_pct, 2.08);
        assert_eq!(result.records[1].coverage_pct, 50.0);
        assert_eq!(result.records[1].notes, "");
    }

    #[test]
    fn test_not_an_array() {
        let err = decode_str(r#"{"sprite_id": "x"}"#, false).unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray("an object")));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(decode_str("[", false), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_lenient_skips_bad_records() {
        let json = r##"[
            {"sprite_id": "a", "category": "Eyes", "variant_hint": "x"},
            {"sprite_id": "a", "variant_hint": "y"},
            "not a record",
            {"sprite_id": "a", "category": "Hair", "variant_hint": "z", "coverage_pct": "n/a"}
        ]"##;
        let result = decode_str(json, false).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(result.warnings[0].record, 1);
        assert_eq!(result.warnings[1].record, 2);
        assert_eq!(result.warnings[2].record, 3);
    }

    #[test]
    fn test_strict_rejects_warnings() {
        let json = r##"[{"sprite_id": "a", "variant_hint": "y"}]"##;
        match decode_str(json, true) {
            Err(LoadError::Strict(warnings)) => assert_eq!(warnings.len(), 1),
            other => panic!("expected strict failure, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let result = load_trait_data(file.path(), true).unwrap();
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_trait_data(Path::new("/nonexistent/trait_suggestions.json"), false).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
