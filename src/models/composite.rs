//! Composite traits: every colour slice of a (sprite, category, variant) merged
//! into one pixel footprint.

use serde::Serialize;

use crate::grid::{coverage_pct, format_pct};
use crate::mask::PixelSet;

use super::record::RawTraitRecord;

/// Identity of a composite trait.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TraitId {
    pub sprite_id: String,
    pub category: String,
    pub variant_hint: String,
}

impl TraitId {
    pub fn new(
        sprite_id: impl Into<String>,
        category: impl Into<String>,
        variant_hint: impl Into<String>,
    ) -> Self {
        Self {
            sprite_id: sprite_id.into(),
            category: category.into(),
            variant_hint: variant_hint.into(),
        }
    }
}

impl std::fmt::Display for TraitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.sprite_id, self.category, self.variant_hint)
    }
}

/// A single-colour contribution to a composite trait.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitSlice {
    pub color_hex: Option<String>,
    pub color_name: Option<String>,
    pub coverage_pct: f64,
    pub notes: String,
    pub pixel_mask: String,
    pub pixels: PixelSet,
}

impl TraitSlice {
    /// Display label, `"Unnamed"` when the slice carries no colour name.
    pub fn label(&self) -> &str {
        self.color_name.as_deref().unwrap_or("Unnamed")
    }

    /// `"<name> (<n> px, <pct>%)"`
    pub fn summary(&self) -> String {
        format!("{} ({} px, {}%)", self.label(), self.pixels.len(), format_pct(self.pixels.len()))
    }
}

impl From<&RawTraitRecord> for TraitSlice {
    fn from(record: &RawTraitRecord) -> Self {
        Self {
            color_hex: record.color_hex.clone(),
            color_name: record.color_name.clone(),
            coverage_pct: record.coverage_pct,
            notes: record.notes.clone(),
            pixel_mask: record.pixel_mask.clone(),
            pixels: record.pixels.clone(),
        }
    }
}

/// A trait after grouping. Immutable once built by
/// [`group_traits`](crate::grouping::group_traits).
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeTrait {
    pub id: TraitId,
    pub slices: Vec<TraitSlice>,
    /// Union of slice pixels in row-major order
    pub pixels: PixelSet,
    /// Serialization of `pixels`
    pub pixel_mask: String,
    pub coverage_pct: f64,
    pub color_hex: Option<String>,
    pub color_name: Option<String>,
    pub multi_color: bool,
    pub notes: String,
    pub slice_summary: String,
    pub priority: u32,
}

impl CompositeTrait {
    pub fn category(&self) -> &str {
        &self.id.category
    }

    pub fn variant_hint(&self) -> &str {
        &self.id.variant_hint
    }

    pub fn sprite_id(&self) -> &str {
        &self.id.sprite_id
    }

    /// Coverage recomputed from the pixel footprint.
    pub fn derived_coverage(&self) -> f64 {
        coverage_pct(self.pixels.len())
    }

    /// Colour cell text as shown in the trait table.
    pub fn colour_label(&self) -> String {
        match (&self.color_hex, &self.color_name) {
            (Some(hex), Some(name)) => format!("{} ({})", name, hex),
            (Some(hex), None) => hex.clone(),
            (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        }
    }

    /// Notes cell text: notes plus, for multi-colour traits, the slice breakdown.
    pub fn display_notes(&self) -> String {
        let mut parts = Vec::new();
        if !self.notes.is_empty() {
            parts.push(self.notes.clone());
        }
        if self.multi_color && !self.slice_summary.is_empty() {
            parts.push(format!("Colours: {}", self.slice_summary));
        }
        parts.join(" · ")
    }

    pub fn to_json(&self) -> serde_json::Value {
        let slices: Vec<serde_json::Value> = self
            .slices
            .iter()
            .map(|s| {
                serde_json::json!({
                    "color_hex": s.color_hex,
                    "color_name": s.color_name,
                    "coverage_pct": s.coverage_pct,
                    "pixel_count": s.pixels.len(),
                    "notes": s.notes,
                })
            })
            .collect();

        serde_json::json!({
            "sprite_id": self.id.sprite_id,
            "category": self.id.category,
            "variant_hint": self.id.variant_hint,
            "color_hex": self.color_hex,
            "color_name": self.color_name,
            "multi_color": self.multi_color,
            "coverage_pct": self.coverage_pct,
            "pixel_count": self.pixels.len(),
            "pixel_mask": self.pixel_mask,
            "notes": self.notes,
            "slice_summary": self.slice_summary,
            "slices": slices,
        })
    }
}
