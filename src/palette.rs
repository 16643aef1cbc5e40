//! Palette extraction from sprite bitmaps
//!
//! Declared trait colours are hand-entered and can drift from the artwork.
//! Sampling the canonical low-resolution bitmap recovers the colours that
//! are actually present and how many pixels each one covers.

use std::collections::HashMap;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::color::to_hex_rgb;
use crate::grid::round2;
use crate::models::RawTraitRecord;

/// Pixels with alpha below this are treated as transparent.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 16;

/// One colour found in a sprite bitmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    /// Lower-case `#rrggbb`
    pub hex: String,
    pub rgb: [u8; 3],
    pub count: usize,
    pub coverage_pct: f64,
    /// Declared colour name matched by hex, if any
    pub name: Option<String>,
}

/// Map of normalized hex to the first declared colour name for it.
pub fn declared_names<'a, I>(records: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a RawTraitRecord>,
{
    let mut names = HashMap::new();
    for record in records {
        if let (Some(hex), Some(name)) = (record.normalized_hex(), &record.color_name) {
            names.entry(hex).or_insert_with(|| name.clone());
        }
    }
    names
}

/// Tally the opaque colours of `image`, most common first.
///
/// Ties are broken by hex string so output is stable.
pub fn extract_palette(
    image: &RgbaImage,
    names: &HashMap<String, String>,
    alpha_threshold: u8,
) -> Vec<PaletteEntry> {
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    for Rgba([r, g, b, a]) in image.pixels().copied() {
        if a < alpha_threshold {
            continue;
        }
        *counts.entry([r, g, b]).or_insert(0) += 1;
    }

    let total = (image.width() as usize * image.height() as usize).max(1);
    let mut entries: Vec<PaletteEntry> = counts
        .into_iter()
        .map(|(rgb, count)| {
            let hex = to_hex_rgb(Rgba([rgb[0], rgb[1], rgb[2], 255]));
            PaletteEntry {
                name: names.get(&hex).cloned(),
                hex,
                rgb,
                count,
                coverage_pct: round2(count as f64 / total as f64 * 100.0),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hex.cmp(&b.hex)));
    entries
}

/// Session cache of sampled palettes keyed by sprite id.
#[derive(Debug, Default)]
pub struct PaletteCache {
    entries: HashMap<String, Rc<Vec<PaletteEntry>>>,
}

impl PaletteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sprite_id: &str) -> Option<Rc<Vec<PaletteEntry>>> {
        self.entries.get(sprite_id).cloned()
    }

    pub fn insert(&mut self, sprite_id: impl Into<String>, palette: Vec<PaletteEntry>) -> Rc<Vec<PaletteEntry>> {
        let palette = Rc::new(palette);
        self.entries.insert(sprite_id.into(), Rc::clone(&palette));
        palette
    }

    /// Cached palette for `sprite_id`, sampling with `sample` on a miss.
    pub fn get_or_insert_with<F, E>(&mut self, sprite_id: &str, sample: F) -> Result<Rc<Vec<PaletteEntry>>, E>
    where
        F: FnOnce() -> Result<Vec<PaletteEntry>, E>,
    {
        if let Some(hit) = self.get(sprite_id) {
            log::debug!("palette cache hit for {}", sprite_id);
            return Ok(hit);
        }
        let palette = sample()?;
        Ok(self.insert(sprite_id, palette))
    }

    pub fn contains(&self, sprite_id: &str) -> bool {
        self.entries.contains_key(sprite_id)
    }
}
