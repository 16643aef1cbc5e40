//! Connected-component segmentation of trait footprints
//!
//! Hand-drawn traits are often several disjoint islands (two earrings, a
//! scatter of freckles). Splitting a footprint into 4-connected components
//! lets each island be inspected and exported on its own.

use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::grid::Pixel;
use crate::mask::PixelSet;
use crate::models::{CompositeTrait, TraitId};

/// One 4-connected island of a pixel set, in flood-fill visit order.
pub type Component = PixelSet;

/// Split a pixel set into 4-connected components, largest first.
///
/// Seeds are taken in the set's iteration order and each component is
/// filled breadth-first. Equal-sized components keep seed order.
///
/// ```
/// use pixeltraits::components::connected_components;
/// use pixeltraits::mask::parse_mask;
///
/// let components = connected_components(&parse_mask("0,0;0,1;5,5"));
/// assert_eq!(components.len(), 2);
/// assert_eq!(components[0].len(), 2);
/// assert_eq!(components[1].len(), 1);
/// ```
pub fn connected_components(pixels: &PixelSet) -> Vec<Component> {
    let mut visited: HashSet<Pixel> = HashSet::with_capacity(pixels.len());
    let mut components = Vec::new();

    for &seed in pixels {
        if !visited.insert(seed) {
            continue;
        }
        let mut component = PixelSet::new();
        let mut queue = VecDeque::from([seed]);

        while let Some(pixel) = queue.pop_front() {
            component.insert(pixel);
            for neighbour in pixel.neighbours() {
                if pixels.contains(&neighbour) && visited.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        components.push(component);
    }

    components.sort_by(|a, b| b.len().cmp(&a.len()));
    components
}

/// Memoized component lists keyed by trait identity.
///
/// Composite traits never change after grouping, so an entry is computed
/// once and handed out as a shared, read-only slice.
#[derive(Debug, Default)]
pub struct ComponentCache {
    entries: HashMap<TraitId, Rc<[Component]>>,
}

impl ComponentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Components of `trait_`, computing them on first request.
    pub fn get(&mut self, trait_: &CompositeTrait) -> Rc<[Component]> {
        if let Some(hit) = self.entries.get(&trait_.id) {
            return Rc::clone(hit);
        }
        log::debug!("computing components for {}", trait_.id);
        let computed: Rc<[Component]> = connected_components(&trait_.pixels).into();
        self.entries.insert(trait_.id.clone(), Rc::clone(&computed));
        computed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which part of a trait to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentSelector {
    /// The whole unioned footprint
    #[default]
    EntireTrait,
    /// One flood-fill island, by index into the size-sorted list
    Component(usize),
    /// One original colour slice, by index
    Slice(usize),
}

impl ComponentSelector {
    /// Parse an option key: `"-1"`, `"component-N"`, `"slice-N"` or a bare index.
    ///
    /// Anything unrecognised selects the entire trait.
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        if let Some(rest) = key.strip_prefix("slice-") {
            return rest.parse().map(Self::Slice).unwrap_or(Self::EntireTrait);
        }
        if let Some(rest) = key.strip_prefix("component-") {
            return rest.parse().map(Self::Component).unwrap_or(Self::EntireTrait);
        }
        key.parse::<usize>().map(Self::Component).unwrap_or(Self::EntireTrait)
    }

    pub fn key(&self) -> String {
        match self {
            Self::EntireTrait => "-1".to_string(),
            Self::Component(i) => format!("component-{}", i),
            Self::Slice(i) => format!("slice-{}", i),
        }
    }
}

impl std::fmt::Display for ComponentSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// Resolve a selector to the pixels it names.
///
/// An out-of-range component or slice index falls back to the entire trait,
/// as does a component request on a trait with no components.
pub fn pixels_for_selector<'a>(
    trait_: &'a CompositeTrait,
    components: &'a [Component],
    selector: ComponentSelector,
) -> &'a PixelSet {
    match selector {
        ComponentSelector::EntireTrait => &trait_.pixels,
        ComponentSelector::Component(i) => components.get(i).unwrap_or(&trait_.pixels),
        ComponentSelector::Slice(i) => trait_.slices.get(i).map(|s| &s.pixels).unwrap_or(&trait_.pixels),
    }
}

/// An entry in the component picker.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorOption {
    pub selector: ComponentSelector,
    pub label: String,
}

/// Picker entries for a trait: the entire trait, each component when there
/// is more than one, and each colour slice when there is more than one.
pub fn selector_options(trait_: &CompositeTrait, components: &[Component]) -> Vec<SelectorOption> {
    let mut options = vec![SelectorOption {
        selector: ComponentSelector::EntireTrait,
        label: "Entire trait".to_string(),
    }];

    if components.len() > 1 {
        for (i, component) in components.iter().enumerate() {
            options.push(SelectorOption {
                selector: ComponentSelector::Component(i),
                label: format!("Component {} ({} px)", i + 1, component.len()),
            });
        }
    }

    if trait_.slices.len() > 1 {
        for (i, slice) in trait_.slices.iter().enumerate() {
            options.push(SelectorOption {
                selector: ComponentSelector::Slice(i),
                label: format!(
                    "{} ({}) — {} px",
                    slice.color_name.as_deref().unwrap_or("Colour"),
                    slice.color_hex.as_deref().unwrap_or("n/a"),
                    slice.pixels.len()
                ),
            });
        }
    }

    options
}
