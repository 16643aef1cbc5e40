//! Sprite index over decoded trait records

use std::collections::{BTreeSet, HashMap};

use crate::category::compare_records;
use crate::grouping::group_traits;
use crate::models::{CompositeTrait, RawTraitRecord};

/// Filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "All";

/// Raw records grouped by sprite, with sprite ids and categories listed.
#[derive(Debug, Clone, Default)]
pub struct TraitIndex {
    sprites: HashMap<String, Vec<RawTraitRecord>>,
    sprite_ids: Vec<String>,
    categories: Vec<String>,
}

impl TraitIndex {
    /// Build the index. Each sprite's records are ordered by category rank,
    /// category, variant and colour; sprite ids are sorted ascending.
    pub fn new(records: Vec<RawTraitRecord>) -> Self {
        let mut sprites: HashMap<String, Vec<RawTraitRecord>> = HashMap::new();
        let mut categories = BTreeSet::new();

        for record in records {
            categories.insert(record.category.clone());
            sprites.entry(record.sprite_id.clone()).or_default().push(record);
        }

        for list in sprites.values_mut() {
            list.sort_by(|a, b| {
                compare_records(
                    (a.category.as_str(), a.variant_hint.as_str(), a.color_hex.as_deref()),
                    (b.category.as_str(), b.variant_hint.as_str(), b.color_hex.as_deref()),
                )
            });
        }

        let mut sprite_ids: Vec<String> = sprites.keys().cloned().collect();
        sprite_ids.sort();

        Self { sprites, sprite_ids, categories: categories.into_iter().collect() }
    }

    pub fn sprite_ids(&self) -> &[String] {
        &self.sprite_ids
    }

    pub fn contains(&self, sprite_id: &str) -> bool {
        self.sprites.contains_key(sprite_id)
    }

    /// Raw records of one sprite in display order.
    pub fn records(&self, sprite_id: &str) -> &[RawTraitRecord] {
        self.sprites.get(sprite_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of raw records for a sprite (the sprite list badge).
    pub fn record_count(&self, sprite_id: &str) -> usize {
        self.records(sprite_id).len()
    }

    /// Categories present in the data, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Entries for the category filter: `"All"` plus every category, sorted.
    pub fn filter_options(&self) -> Vec<String> {
        let mut options: Vec<String> = self.categories.clone();
        if !options.iter().any(|c| c == ALL_CATEGORIES) {
            options.push(ALL_CATEGORIES.to_string());
        }
        options.sort();
        options
    }

    /// Sprite ids containing `needle` (case-insensitive).
    pub fn search(&self, needle: &str) -> Vec<&str> {
        let needle = needle.trim().to_lowercase();
        self.sprite_ids
            .iter()
            .filter(|id| id.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Composite traits of a sprite, optionally restricted to one category.
    ///
    /// `None` or `"All"` means no filter.
    pub fn composite_traits(&self, sprite_id: &str, category: Option<&str>) -> Vec<CompositeTrait> {
        let filter = category.filter(|c| *c != ALL_CATEGORIES);
        group_traits(self.records(sprite_id).iter().filter(|r| filter.map_or(true, |c| r.category == c)))
    }
}
