//! WASM API module for browser/JS interop
//!
//! Exposes the pure parts of the trait viewer (mask parsing, grouping,
//! components, picking, overlay geometry) to the page script. Structured
//! results are returned as JSON strings.

use wasm_bindgen::prelude::*;

use crate::components::connected_components;
use crate::grouping::group_traits;
use crate::loader::decode_str;
use crate::mask::{self, serialize_mask};
use crate::models::CompositeTrait;
use crate::overlay::{find_trait_at, pick_cell, plan_overlay, CanvasSize, GridScale};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Decode records and group their traits, returning warnings as text.
///
/// With no `sprite_id`, every sprite is grouped on its own and the results
/// follow the order in which sprites first appear.
fn traits_for(records_json: &str, sprite_id: Option<&str>) -> (Vec<CompositeTrait>, Vec<String>) {
    let loaded = match decode_str(records_json, false) {
        Ok(loaded) => loaded,
        Err(e) => return (Vec::new(), vec![e.to_string()]),
    };
    let warnings = loaded.warnings.iter().map(|w| w.to_string()).collect();

    let sprites: Vec<&str> = match sprite_id {
        Some(id) => vec![id],
        None => {
            let mut seen: Vec<&str> = Vec::new();
            for record in &loaded.records {
                if !seen.contains(&record.sprite_id.as_str()) {
                    seen.push(&record.sprite_id);
                }
            }
            seen
        }
    };
    let traits = sprites
        .into_iter()
        .flat_map(|id| group_traits(loaded.records.iter().filter(|r| r.sprite_id == id)))
        .collect();
    (traits, warnings)
}

/// Parse a pixel mask into a flat `[row, col, row, col, ...]` array.
///
/// Malformed and out-of-range tokens are dropped.
#[wasm_bindgen]
pub fn parse_mask(mask: &str) -> Vec<u32> {
    mask::parse_mask(mask).iter().flat_map(|p| [p.row, p.col]).collect()
}

/// Group a JSON array of trait records into composite traits.
///
/// Each sprite is grouped separately; traits of one sprite are contiguous.
///
/// # Returns
/// `{"traits": [...], "warnings": [...]}`
#[wasm_bindgen]
pub fn group_traits_json(records_json: &str) -> String {
    let (traits, warnings) = traits_for(records_json, None);
    let traits: Vec<serde_json::Value> = traits.iter().map(|t| t.to_json()).collect();
    serde_json::json!({ "traits": traits, "warnings": warnings }).to_string()
}

/// Connected components of a mask, largest first, as mask strings.
#[wasm_bindgen]
pub fn components_json(mask: &str) -> String {
    let components: Vec<String> =
        connected_components(&mask::parse_mask(mask)).iter().map(|c| serialize_mask(c)).collect();
    serde_json::json!(components).to_string()
}

/// Index of the trait of `sprite_id` under a click, or -1 when none.
#[wasm_bindgen]
pub fn pick_trait(records_json: &str, sprite_id: &str, rel_x: f64, rel_y: f64, width: f64, height: f64) -> i32 {
    let (traits, _) = traits_for(records_json, Some(sprite_id));
    pick_cell(rel_x, rel_y, width, height)
        .and_then(|cell| find_trait_at(&traits, cell))
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(-1)
}

/// Highlight geometry for a mask shown at `width × height`.
///
/// # Returns
/// `{"fills": [...], "bounds": {...}}`, or `null` when there is nothing to draw
#[wasm_bindgen]
pub fn overlay_plan_json(mask: &str, width: f64, height: f64) -> String {
    let plan = plan_overlay(&mask::parse_mask(mask), GridScale::new(width, height));
    serde_json::to_string(&plan).unwrap_or_else(|_| "null".to_string())
}

/// Canvas backing-store size for a display size and device pixel ratio.
#[wasm_bindgen]
pub fn canvas_size_json(width: f64, height: f64, device_pixel_ratio: f64) -> String {
    serde_json::to_string(&CanvasSize::for_display(width, height, device_pixel_ratio))
        .unwrap_or_else(|_| "null".to_string())
}
