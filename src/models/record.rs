//! Raw trait layer records as authored in the trait data file.

use serde::{Deserialize, Serialize};

use crate::mask::{parse_mask, PixelSet};

/// Diagnostic produced while decoding trait data leniently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub message: String,
    /// Index of the offending record in the input array
    pub record: usize,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.record, self.message)
    }
}

/// A coverage figure that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoverageValue {
    Number(f64),
    Text(String),
}

impl CoverageValue {
    /// Coerce to a number. Empty strings are zero; unparseable strings yield `None`.
    ///
    /// A trailing `%` is accepted on string values.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            CoverageValue::Number(n) => Some(*n),
            CoverageValue::Text(s) => {
                let trimmed = s.trim();
                let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }
}

/// Wire shape of a trait record. Every field is optional so that a single
/// bad record can be reported instead of failing the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecordJson {
    #[serde(default)]
    pub sprite_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub variant_hint: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub color_name: Option<String>,
    #[serde(default)]
    pub coverage_pct: Option<CoverageValue>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub pixel_mask: Option<String>,
}

/// One colour slice of one trait layer of one sprite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTraitRecord {
    pub sprite_id: String,
    pub category: String,
    pub variant_hint: String,
    pub color_hex: Option<String>,
    pub color_name: Option<String>,
    /// Declared coverage; metadata only, never used for composite coverage
    pub coverage_pct: f64,
    pub notes: String,
    pub pixel_mask: String,
    #[serde(skip)]
    pub pixels: PixelSet,
}

/// Normalize a hex colour for comparison: trimmed, lower-cased, `#`-prefixed.
///
/// Returns `None` for empty input.
pub fn normalize_hex(hex: &str) -> Option<String> {
    let trimmed = hex.trim();
    if trimmed.is_empty() {
        return None;
    }
    let bare = trimmed.strip_prefix('#').unwrap_or(trimmed);
    Some(format!("#{}", bare.to_ascii_lowercase()))
}

fn is_hex_color(hex: &str) -> bool {
    let bare = hex.strip_prefix('#').unwrap_or(hex);
    bare.len() == 6 && bare.chars().all(|c| c.is_ascii_hexdigit())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl RawTraitRecord {
    /// Build a record directly, parsing its mask.
    pub fn new(
        sprite_id: impl Into<String>,
        category: impl Into<String>,
        variant_hint: impl Into<String>,
        color_hex: Option<&str>,
        color_name: Option<&str>,
        pixel_mask: impl Into<String>,
    ) -> Self {
        let pixel_mask = pixel_mask.into();
        let pixels = parse_mask(&pixel_mask);
        Self {
            sprite_id: sprite_id.into(),
            category: category.into(),
            variant_hint: variant_hint.into(),
            color_hex: color_hex.map(str::to_string),
            color_name: color_name.map(str::to_string),
            coverage_pct: 0.0,
            notes: String::new(),
            pixel_mask,
            pixels,
        }
    }

    /// Validate a wire record.
    ///
    /// Returns the record and any non-fatal problems, or an error message when
    /// an identity field is missing.
    pub fn from_json(raw: RawRecordJson) -> Result<(Self, Vec<String>), String> {
        let mut problems = Vec::new();

        let sprite_id = non_empty(raw.sprite_id).ok_or("missing sprite_id")?;
        let category = non_empty(raw.category).ok_or("missing category")?;
        let variant_hint = non_empty(raw.variant_hint).ok_or("missing variant_hint")?;

        let coverage_pct = match raw.coverage_pct {
            None => 0.0,
            Some(value) => value.to_f64().unwrap_or_else(|| {
                problems.push(format!("coverage_pct {:?} is not numeric, using 0", value));
                0.0
            }),
        };

        let color_hex = non_empty(raw.color_hex);
        if let Some(hex) = &color_hex {
            if !is_hex_color(hex) {
                problems.push(format!("color_hex '{}' is not a 6-digit hex colour", hex));
            }
        }

        let pixel_mask = raw.pixel_mask.unwrap_or_default();
        let pixels = parse_mask(&pixel_mask);

        Ok((
            Self {
                sprite_id,
                category,
                variant_hint,
                color_hex,
                color_name: non_empty(raw.color_name),
                coverage_pct,
                notes: raw.notes.unwrap_or_default().trim().to_string(),
                pixel_mask,
                pixels,
            },
            problems,
        ))
    }

    /// Lower-cased `#rrggbb` form of this slice's colour.
    pub fn normalized_hex(&self) -> Option<String> {
        self.color_hex.as_deref().and_then(normalize_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<(RawTraitRecord, Vec<String>), String> {
        let raw: RawRecordJson = serde_json::from_str(json).unwrap();
        RawTraitRecord::from_json(raw)
    }

    #[test]
    fn test_coverage_number() {
        let (rec, problems) = decode(
            r##"{"sprite_id":"a","category":"Eyes","variant_hint":"x","coverage_pct":2.5}"##,
        )
        .unwrap();
        assert_eq!(rec.coverage_pct, 2.5);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_coverage_string_coerced() {
        let (rec, problems) = decode(
            r##"{"sprite_id":"a","category":"Eyes","variant_hint":"x","coverage_pct":"4.17"}"##,
        )
        .unwrap();
        assert_eq!(rec.coverage_pct, 4.17);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_coverage_percent_suffix_and_empty() {
        assert_eq!(CoverageValue::Text("1.5%".into()).to_f64(), Some(1.5));
        assert_eq!(CoverageValue::Text("".into()).to_f64(), Some(0.0));
    }

    #[test]
    fn test_coverage_garbage_warns() {
        let (rec, problems) = decode(
            r##"{"sprite_id":"a","category":"Eyes","variant_hint":"x","coverage_pct":"lots"}"##,
        )
        .unwrap();
        assert_eq!(rec.coverage_pct, 0.0);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_missing_identity_rejected() {
        let err = decode(r##"{"sprite_id":"a","variant_hint":"x"}"##).unwrap_err();
        assert!(err.contains("category"));
    }

    #[test]
    fn test_absent_mask_is_empty() {
        let (rec, _) =
            decode(r##"{"sprite_id":"a","category":"Eyes","variant_hint":"x","pixel_mask":null}"##)
                .unwrap();
        assert!(rec.pixels.is_empty());
        assert_eq!(rec.pixel_mask, "");
    }

    #[test]
    fn test_bad_hex_warns_but_keeps_record() {
        let (rec, problems) =
            decode(r##"{"sprite_id":"a","category":"Eyes","variant_hint":"x","color_hex":"blue"}"##)
                .unwrap();
        assert_eq!(rec.color_hex.as_deref(), Some("blue"));
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#AABBCC").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_hex("AABBCC").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_hex("  "), None);
    }
}
