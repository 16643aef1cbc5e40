//! Viewer state and its transitions
//!
//! One [`ViewerState`] owns everything the trait viewer shows: the sprite
//! list, the composite traits of the selected sprite, the selected trait and
//! component, and the component/palette caches. All changes go through the
//! transition methods below so that late results (a palette sampled for a
//! sprite that is no longer selected) can be recognised and dropped.

use std::rc::Rc;

use crate::components::{pixels_for_selector, selector_options, ComponentCache, ComponentSelector, SelectorOption};
use crate::export::format_pixel_summary;
use crate::index::{TraitIndex, ALL_CATEGORIES};
use crate::mask::{serialize_mask, PixelSet};
use crate::models::{normalize_hex, CompositeTrait};
use crate::overlay::{find_trait_at, pick_cell};
use crate::palette::{PaletteCache, PaletteEntry};

/// Shown when no trait is selected.
pub const NO_SELECTION_TEXT: &str = "Select a trait to preview pixel coordinates.";

/// Shown when the selected trait (or part) has no pixels.
pub const NO_PIXELS_TEXT: &str = "No pixel data available for this trait.";

/// What is currently highlighted on the sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub trait_index: usize,
    pub selector: ComponentSelector,
    pub pixels: PixelSet,
    pub mask: String,
    pub summary: String,
}

/// Header statistics for the selected sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerStats {
    pub trait_count: usize,
    pub background: Option<String>,
    pub unique_colours: usize,
}

/// Proof that a palette request was issued for a particular selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTicket {
    pub sprite_id: String,
    generation: u64,
}

/// State container for the trait viewer.
#[derive(Debug)]
pub struct ViewerState {
    index: TraitIndex,
    search: String,
    selected_sprite: Option<String>,
    category_filter: String,
    traits: Vec<CompositeTrait>,
    selected_trait: Option<usize>,
    selector: ComponentSelector,
    hover_preview: bool,
    hovered: Option<usize>,
    components: ComponentCache,
    palettes: PaletteCache,
    generation: u64,
    palette: Option<Rc<Vec<PaletteEntry>>>,
}

impl ViewerState {
    /// Create a viewer over `index` and select the first sprite, if any.
    pub fn new(index: TraitIndex) -> Self {
        let mut state = Self {
            index,
            search: String::new(),
            selected_sprite: None,
            category_filter: ALL_CATEGORIES.to_string(),
            traits: Vec::new(),
            selected_trait: None,
            selector: ComponentSelector::EntireTrait,
            hover_preview: true,
            hovered: None,
            components: ComponentCache::new(),
            palettes: PaletteCache::new(),
            generation: 0,
            palette: None,
        };
        if let Some(first) = state.index.sprite_ids().first().cloned() {
            state.select_sprite(&first);
        }
        state
    }

    pub fn index(&self) -> &TraitIndex {
        &self.index
    }

    pub fn selected_sprite(&self) -> Option<&str> {
        self.selected_sprite.as_deref()
    }

    pub fn category_filter(&self) -> &str {
        &self.category_filter
    }

    /// Composite traits currently displayed, in display order.
    pub fn traits(&self) -> &[CompositeTrait] {
        &self.traits
    }

    pub fn selected_trait_index(&self) -> Option<usize> {
        self.selected_trait
    }

    pub fn selected_trait(&self) -> Option<&CompositeTrait> {
        self.selected_trait.and_then(|i| self.traits.get(i))
    }

    pub fn selector(&self) -> ComponentSelector {
        self.selector
    }

    pub fn hover_preview(&self) -> bool {
        self.hover_preview
    }

    /// Sprite ids matching the current search text.
    pub fn visible_sprites(&self) -> Vec<&str> {
        self.index.search(&self.search)
    }

    /// Select a sprite. Unknown ids leave the state untouched.
    ///
    /// Resets the category filter and selects the first trait.
    pub fn select_sprite(&mut self, sprite_id: &str) -> bool {
        if !self.index.contains(sprite_id) {
            return false;
        }
        self.selected_sprite = Some(sprite_id.to_string());
        self.category_filter = ALL_CATEGORIES.to_string();
        self.generation += 1;
        self.palette = self.palettes.get(sprite_id);
        self.rebuild_traits();
        true
    }

    /// Change the category filter and rebuild the trait list.
    pub fn change_filter(&mut self, category: &str) {
        self.category_filter =
            if category.is_empty() { ALL_CATEGORIES.to_string() } else { category.to_string() };
        self.rebuild_traits();
    }

    fn rebuild_traits(&mut self) {
        self.traits = match &self.selected_sprite {
            Some(id) => self.index.composite_traits(id, Some(&self.category_filter)),
            None => Vec::new(),
        };
        self.selected_trait = None;
        self.selector = ComponentSelector::EntireTrait;
        self.hovered = None;
        if !self.traits.is_empty() {
            self.select_trait(0);
        }
    }

    /// Update the sprite search. If the selected sprite no longer matches,
    /// the first match is selected.
    pub fn set_search(&mut self, text: &str) -> Vec<String> {
        self.search = text.trim().to_lowercase();
        let matches: Vec<String> = self.visible_sprites().into_iter().map(str::to_string).collect();
        let still_visible = self.selected_sprite.as_ref().is_some_and(|id| matches.contains(id));
        if !still_visible {
            if let Some(first) = matches.first() {
                self.select_sprite(first);
            }
        }
        matches
    }

    /// Select a trait row. Out-of-range indices are ignored.
    pub fn select_trait(&mut self, index: usize) -> bool {
        if index >= self.traits.len() {
            return false;
        }
        self.selected_trait = Some(index);
        self.selector = ComponentSelector::EntireTrait;
        true
    }

    /// Choose which part of the selected trait to highlight.
    pub fn select_component(&mut self, selector: ComponentSelector) -> bool {
        if self.selected_trait.is_none() {
            return false;
        }
        self.selector = selector;
        true
    }

    /// Select a trait row and one of its colour slices in one step.
    pub fn select_slice(&mut self, trait_index: usize, slice_index: usize) -> bool {
        self.select_trait(trait_index) && self.select_component(ComponentSelector::Slice(slice_index))
    }

    /// Handle a click at `(rel_x, rel_y)` on an image drawn at `width × height`.
    ///
    /// Selects the first displayed trait owning the clicked cell. Clicks
    /// outside the image or on an unowned cell change nothing.
    pub fn pick(&mut self, rel_x: f64, rel_y: f64, width: f64, height: f64) -> Option<usize> {
        if self.traits.is_empty() {
            return None;
        }
        let cell = pick_cell(rel_x, rel_y, width, height)?;
        let index = find_trait_at(&self.traits, cell)?;
        self.select_trait(index);
        Some(index)
    }

    /// Pointer entered (`Some`) or left (`None`) a trait row.
    pub fn hover(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|i| *i < self.traits.len());
    }

    pub fn set_hover_preview(&mut self, enabled: bool) {
        self.hover_preview = enabled;
        if !enabled {
            self.hovered = None;
        }
    }

    /// The trait whose pixels are drawn: a hovered row when previewing,
    /// otherwise the selection.
    fn displayed_trait(&self) -> Option<usize> {
        match self.hovered {
            Some(i) if self.hover_preview && Some(i) != self.selected_trait => Some(i),
            _ => self.selected_trait,
        }
    }

    /// Compute the current highlight. `None` when nothing is selected or the
    /// selection has no pixels.
    pub fn highlight(&mut self) -> Option<Highlight> {
        let index = self.displayed_trait()?;
        let trait_ = self.traits.get(index)?;
        let components = self.components.get(trait_);
        let pixels = pixels_for_selector(trait_, &components, self.selector);
        if pixels.is_empty() {
            return None;
        }
        let mask = serialize_mask(pixels);
        Some(Highlight {
            trait_index: index,
            selector: self.selector,
            pixels: pixels.clone(),
            summary: format_pixel_summary(&mask, pixels.len()),
            mask,
        })
    }

    /// Mask text for the copy button; empty when there is nothing to copy.
    pub fn current_mask(&mut self) -> String {
        self.highlight().map(|h| h.mask).unwrap_or_default()
    }

    /// Text for the pixel output panel.
    pub fn mask_status(&mut self) -> String {
        if self.selected_trait.is_none() {
            return NO_SELECTION_TEXT.to_string();
        }
        self.highlight().map(|h| h.summary).unwrap_or_else(|| NO_PIXELS_TEXT.to_string())
    }

    /// Picker entries for the selected trait.
    pub fn selector_options(&mut self) -> Vec<SelectorOption> {
        let Some(trait_) = self.selected_trait.and_then(|i| self.traits.get(i)) else {
            return Vec::new();
        };
        let components = self.components.get(trait_);
        selector_options(trait_, &components)
    }

    pub fn stats(&self) -> ViewerStats {
        let mut colours: Vec<String> = Vec::new();
        for trait_ in &self.traits {
            for slice in &trait_.slices {
                if let Some(hex) = slice.color_hex.as_deref().and_then(normalize_hex) {
                    if !colours.contains(&hex) {
                        colours.push(hex);
                    }
                }
            }
        }
        ViewerStats {
            trait_count: self.traits.len(),
            background: self
                .traits
                .iter()
                .find(|t| t.category() == "Background")
                .map(|t| t.variant_hint().to_string()),
            unique_colours: colours.len(),
        }
    }

    /// Palette of the selected sprite, if one has been applied.
    pub fn palette(&self) -> Option<&[PaletteEntry]> {
        self.palette.as_deref().map(Vec::as_slice)
    }

    /// Start sampling the selected sprite's palette.
    ///
    /// Returns `None` when no sprite is selected or the palette is already
    /// cached (in which case it is already applied).
    pub fn begin_palette_request(&mut self) -> Option<PaletteTicket> {
        let sprite_id = self.selected_sprite.clone()?;
        if let Some(cached) = self.palettes.get(&sprite_id) {
            self.palette = Some(cached);
            return None;
        }
        Some(PaletteTicket { sprite_id, generation: self.generation })
    }

    /// Apply a sampled palette. Results for a superseded selection are
    /// discarded and `false` is returned.
    pub fn apply_palette(&mut self, ticket: &PaletteTicket, palette: Vec<PaletteEntry>) -> bool {
        let current = self.selected_sprite.as_deref() == Some(ticket.sprite_id.as_str());
        if !current || ticket.generation != self.generation {
            log::debug!("discarding stale palette for {}", ticket.sprite_id);
            return false;
        }
        self.palette = Some(self.palettes.insert(ticket.sprite_id.clone(), palette));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pixel;
    use crate::models::RawTraitRecord;

    fn state() -> ViewerState {
        let records = vec![
            RawTraitRecord::new("lady_007", "Background", "teal", Some("#008080"), Some("teal"), "0,0;0,1"),
            RawTraitRecord::new("lady_007", "Eyes", "almond", Some("#112233"), Some("navy"), "8,0;8,1"),
            RawTraitRecord::new("lady_007", "Eyes", "almond", Some("#445566"), Some("slate"), "8,1;8,5"),
            RawTraitRecord::new("lady_007", "Mouth", "smile", Some("#ff0000"), Some("red"), ""),
            RawTraitRecord::new("punk_2", "Hair", "mohawk", Some("#00ff00"), Some("green"), "0,5"),
        ];
        ViewerState::new(TraitIndex::new(records))
    }

    fn entry(hex: &str) -> PaletteEntry {
        PaletteEntry { hex: hex.into(), rgb: [0, 0, 0], count: 1, coverage_pct: 0.17, name: None }
    }

    #[test]
    fn test_initial_selection() {
        let mut s = state();
        assert_eq!(s.selected_sprite(), Some("lady_007"));
        assert_eq!(s.traits().len(), 3);
        assert_eq!(s.selected_trait_index(), Some(0));
        assert_eq!(s.current_mask(), "0,0;0,1");
    }

    #[test]
    fn test_select_unknown_sprite_is_noop() {
        let mut s = state();
        assert!(!s.select_sprite("nobody"));
        assert_eq!(s.selected_sprite(), Some("lady_007"));
    }

    #[test]
    fn test_change_filter_rebuilds() {
        let mut s = state();
        s.change_filter("Eyes");
        assert_eq!(s.traits().len(), 1);
        assert_eq!(s.traits()[0].pixels.len(), 3);
        assert_eq!(s.selected_trait_index(), Some(0));

        s.change_filter("Hair");
        assert!(s.traits().is_empty());
        assert_eq!(s.selected_trait_index(), None);
        assert_eq!(s.mask_status(), NO_SELECTION_TEXT);
    }

    #[test]
    fn test_select_sprite_resets_filter() {
        let mut s = state();
        s.change_filter("Eyes");
        s.select_sprite("punk_2");
        assert_eq!(s.category_filter(), "All");
        assert_eq!(s.traits().len(), 1);
    }

    #[test]
    fn test_component_and_slice_selection() {
        let mut s = state();
        s.select_trait(1);
        assert!(s.select_component(ComponentSelector::Component(1)));
        assert_eq!(s.highlight().unwrap().pixels.as_slice(), &[Pixel::new(8, 5)]);

        assert!(s.select_slice(1, 0));
        assert_eq!(s.current_mask(), "8,0;8,1");

        // re-selecting the row resets to the entire trait
        s.select_trait(1);
        assert_eq!(s.selector(), ComponentSelector::EntireTrait);
        assert_eq!(s.current_mask(), "8,0;8,1;8,5");
    }

    #[test]
    fn test_empty_trait_reports_no_pixels() {
        let mut s = state();
        s.select_trait(2);
        assert!(s.highlight().is_none());
        assert_eq!(s.mask_status(), NO_PIXELS_TEXT);
        assert_eq!(s.current_mask(), "");
    }

    #[test]
    fn test_pick_selects_owner() {
        let mut s = state();
        // cell (8,5) on a 240px image: x = 55, y = 85
        assert_eq!(s.pick(55.0, 85.0, 240.0, 240.0), Some(1));
        assert_eq!(s.selected_trait_index(), Some(1));
    }

    #[test]
    fn test_pick_unowned_cell_keeps_selection() {
        let mut s = state();
        s.select_trait(1);
        // cell (10,10)
        assert_eq!(s.pick(105.0, 105.0, 240.0, 240.0), None);
        assert_eq!(s.selected_trait_index(), Some(1));
        assert_eq!(s.pick(-3.0, 10.0, 240.0, 240.0), None);
        assert_eq!(s.selected_trait_index(), Some(1));
    }

    #[test]
    fn test_hover_preview() {
        let mut s = state();
        s.hover(Some(1));
        assert_eq!(s.highlight().unwrap().trait_index, 1);
        s.hover(None);
        assert_eq!(s.highlight().unwrap().trait_index, 0);

        s.set_hover_preview(false);
        s.hover(Some(1));
        assert_eq!(s.highlight().unwrap().trait_index, 0);
    }

    #[test]
    fn test_search_moves_selection() {
        let mut s = state();
        let matches = s.set_search("PUNK");
        assert_eq!(matches, vec!["punk_2"]);
        assert_eq!(s.selected_sprite(), Some("punk_2"));

        // no matches leaves the selection alone
        assert!(s.set_search("zzz").is_empty());
        assert_eq!(s.selected_sprite(), Some("punk_2"));
    }

    #[test]
    fn test_stats() {
        let s = state();
        let stats = s.stats();
        assert_eq!(stats.trait_count, 3);
        assert_eq!(stats.background.as_deref(), Some("teal"));
        assert_eq!(stats.unique_colours, 4);
    }

    #[test]
    fn test_selector_options_for_multi_colour_trait() {
        let mut s = state();
        s.select_trait(1);
        let options = s.selector_options();
        // entire, two components, two slices
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn test_palette_applied_for_current_selection() {
        let mut s = state();
        let ticket = s.begin_palette_request().unwrap();
        assert!(s.apply_palette(&ticket, vec![entry("#112233")]));
        assert_eq!(s.palette().unwrap().len(), 1);

        // cached now, no new request needed
        assert!(s.begin_palette_request().is_none());
    }

    #[test]
    fn test_stale_palette_is_discarded() {
        let mut s = state();
        let ticket = s.begin_palette_request().unwrap();
        s.select_sprite("punk_2");
        assert!(!s.apply_palette(&ticket, vec![entry("#112233")]));
        assert!(s.palette().is_none());

        // reselecting the same sprite also invalidates older tickets
        s.select_sprite("lady_007");
        assert!(!s.apply_palette(&ticket, vec![entry("#112233")]));
        assert!(s.palette().is_none());
    }

    #[test]
    fn test_cached_palette_restored_on_reselect() {
        let mut s = state();
        let ticket = s.begin_palette_request().unwrap();
        s.apply_palette(&ticket, vec![entry("#112233")]);
        s.select_sprite("punk_2");
        assert!(s.palette().is_none());
        s.select_sprite("lady_007");
        assert_eq!(s.palette().unwrap()[0].hex, "#112233");
    }
}
