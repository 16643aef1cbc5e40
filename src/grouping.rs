//! Trait grouping
//!
//! The trait data stores one record per colour slice. A layer such as
//! `Eyes/almond` drawn with two colours arrives as two records; grouping
//! merges them into one [`CompositeTrait`] whose footprint is the union of
//! the slices and whose coverage is recomputed from that union.

use std::collections::HashMap;

use crate::category::{category_priority, compare_traits};
use crate::grid::coverage_pct;
use crate::mask::{serialize_mask, PixelSet};
use crate::models::{CompositeTrait, RawTraitRecord, TraitId, TraitSlice};

/// Separator between distinct slice notes.
pub const NOTES_SEPARATOR: &str = " · ";

/// Separator between slice summaries.
pub const SUMMARY_SEPARATOR: &str = " • ";

/// Slices collected for one (sprite, category, variant) bucket.
struct Bucket {
    sprite_id: String,
    category: String,
    variant_hint: String,
    slices: Vec<TraitSlice>,
}

/// Push `value` if not already present, keeping first-seen order.
fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

fn build_composite(bucket: Bucket) -> CompositeTrait {
    let mut union = PixelSet::new();
    let mut notes: Vec<String> = Vec::new();
    let mut colour_names: Vec<String> = Vec::new();
    let mut colour_hexes: Vec<String> = Vec::new();

    for slice in &bucket.slices {
        union.extend_from(&slice.pixels);
        if !slice.notes.is_empty() {
            push_unique(&mut notes, &slice.notes);
        }
        if let Some(name) = &slice.color_name {
            push_unique(&mut colour_names, name);
        }
        if let Some(hex) = slice.color_hex.as_deref().and_then(crate::models::normalize_hex) {
            push_unique(&mut colour_hexes, &hex);
        }
    }

    let pixels = union.sorted();
    let pixel_mask = serialize_mask(&pixels);
    let coverage = coverage_pct(pixels.len());

    let slice_summary =
        bucket.slices.iter().map(TraitSlice::summary).collect::<Vec<_>>().join(SUMMARY_SEPARATOR);

    let (color_hex, color_name, multi_color) = if colour_hexes.len() == 1 {
        let first = bucket.slices.iter().find(|s| s.color_hex.is_some());
        (
            first.and_then(|s| s.color_hex.clone()),
            first.and_then(|s| s.color_name.clone()),
            false,
        )
    } else {
        (None, Some(format!("{} colours", colour_hexes.len())), true)
    };

    let mut notes = notes.join(NOTES_SEPARATOR);
    if notes.is_empty() && !colour_names.is_empty() {
        notes = format!("Unique colours {}", colour_names.join(", "));
    }

    let priority = category_priority(&bucket.category);
    CompositeTrait {
        id: TraitId::new(bucket.sprite_id, bucket.category, bucket.variant_hint),
        slices: bucket.slices,
        pixels,
        pixel_mask,
        coverage_pct: coverage,
        color_hex,
        color_name,
        multi_color,
        notes,
        slice_summary,
        priority,
    }
}

/// Group the records of one sprite into composite traits.
///
/// Records are bucketed by `(sprite_id, category, variant_hint)`, so
/// records from other sprites never merge. Buckets with no
/// pixels at all are kept so declared-but-empty layers stay visible. The
/// result is ordered by category rank, category name, then variant.
///
/// ```
/// use pixeltraits::grouping::group_traits;
/// use pixeltraits::models::RawTraitRecord;
///
/// let records = vec![
///     RawTraitRecord::new("s1", "Eyes", "almond", Some("#112233"), Some("navy"), "1,1;1,2"),
///     RawTraitRecord::new("s1", "Eyes", "almond", Some("#445566"), Some("slate"), "1,2;1,3"),
/// ];
/// let traits = group_traits(&records);
/// assert_eq!(traits.len(), 1);
/// assert_eq!(traits[0].pixels.len(), 3);
/// assert_eq!(traits[0].color_name.as_deref(), Some("2 colours"));
/// ```
pub fn group_traits<'a, I>(records: I) -> Vec<CompositeTrait>
where
    I: IntoIterator<Item = &'a RawTraitRecord>,
{
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();

    for record in records {
        let key =
            (record.sprite_id.clone(), record.category.clone(), record.variant_hint.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(Bucket {
                sprite_id: record.sprite_id.clone(),
                category: record.category.clone(),
                variant_hint: record.variant_hint.clone(),
                slices: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].slices.push(TraitSlice::from(record));
    }

    let mut traits: Vec<CompositeTrait> = buckets.into_iter().map(build_composite).collect();
    sort_traits(&mut traits);
    traits
}

/// Sort composite traits into display order.
pub fn sort_traits(traits: &mut [CompositeTrait]) {
    traits.sort_by(|a, b| {
        compare_traits(a.category(), a.variant_hint(), b.category(), b.variant_hint())
    });
}
