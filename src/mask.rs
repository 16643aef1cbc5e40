//! Pixel mask codec
//!
//! Trait layers store their pixels as a compact coordinate list:
//! `"row,col;row,col;..."`. Parsing is best-effort because the data is
//! hand-authored: a malformed pair is dropped on its own and never fails
//! the whole mask.

use std::collections::HashSet;

use crate::grid::Pixel;

/// An insertion-ordered set of grid pixels.
///
/// Iteration order is the order in which pixels were first inserted, which
/// keeps flood-fill seeding and mask serialization deterministic.
#[derive(Debug, Clone, Default)]
pub struct PixelSet {
    order: Vec<Pixel>,
    members: HashSet<Pixel>,
}

impl PixelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pixel. Returns `false` if it was already present.
    pub fn insert(&mut self, pixel: Pixel) -> bool {
        if self.members.insert(pixel) {
            self.order.push(pixel);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, pixel: &Pixel) -> bool {
        self.members.contains(pixel)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pixel> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[Pixel] {
        &self.order
    }

    /// Add every pixel of `other` that is not yet present.
    pub fn extend_from(&mut self, other: &PixelSet) {
        for pixel in other.iter() {
            self.insert(*pixel);
        }
    }

    /// A copy of this set ordered row-major (row, then column).
    pub fn sorted(&self) -> PixelSet {
        let mut order = self.order.clone();
        order.sort();
        PixelSet { order, members: self.members.clone() }
    }

    /// Set equality, ignoring iteration order.
    pub fn set_eq(&self, other: &PixelSet) -> bool {
        self.members == other.members
    }
}

impl FromIterator<Pixel> for PixelSet {
    fn from_iter<I: IntoIterator<Item = Pixel>>(iter: I) -> Self {
        let mut set = PixelSet::new();
        for pixel in iter {
            set.insert(pixel);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PixelSet {
    type Item = &'a Pixel;
    type IntoIter = std::slice::Iter<'a, Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

impl PartialEq for PixelSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for PixelSet {}

/// Outcome of parsing a mask with diagnostics.
#[derive(Debug, Clone, Default)]
pub struct MaskParse {
    pub pixels: PixelSet,
    /// Tokens that were not a valid on-canvas `row,col` pair
    pub dropped: usize,
}

/// Parse a single `row,col` token.
fn parse_token(token: &str) -> Option<Pixel> {
    let mut parts = token.split(',');
    let row = parts.next()?.trim().parse::<u32>().ok()?;
    let col = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let pixel = Pixel::new(row, col);
    pixel.in_bounds().then_some(pixel)
}

/// Parse a mask string and report how many tokens were dropped.
pub fn parse_mask_with_report(mask: &str) -> MaskParse {
    let mut result = MaskParse::default();
    if mask.trim().is_empty() {
        return result;
    }

    for token in mask.split(';') {
        match parse_token(token) {
            Some(pixel) => {
                result.pixels.insert(pixel);
            }
            None => result.dropped += 1,
        }
    }

    if result.dropped > 0 {
        log::debug!("dropped {} malformed mask token(s)", result.dropped);
    }
    result
}

/// Parse a `"row,col;row,col"` mask into a pixel set.
///
/// Malformed or off-canvas tokens are silently discarded. An empty string
/// yields an empty set.
///
/// ```
/// use pixeltraits::mask::parse_mask;
///
/// let pixels = parse_mask("0,0;0,1;oops;5,5");
/// assert_eq!(pixels.len(), 3);
/// ```
pub fn parse_mask(mask: &str) -> PixelSet {
    parse_mask_with_report(mask).pixels
}

/// Serialize pixels in their iteration order.
pub fn serialize_mask<'a, I>(pixels: I) -> String
where
    I: IntoIterator<Item = &'a Pixel>,
{
    pixels.into_iter().map(|p| p.to_string()).collect::<Vec<_>>().join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(parse_mask("").is_empty());
        assert!(parse_mask("   ").is_empty());
    }

    #[test]
    fn test_parse_simple() {
        let pixels = parse_mask("0,0;0,1;5,5");
        assert_eq!(pixels.as_slice(), &[Pixel::new(0, 0), Pixel::new(0, 1), Pixel::new(5, 5)]);
    }

    #[test]
    fn test_parse_drops_malformed_tokens() {
        let report = parse_mask_with_report("1,2;x,3;4;;7,y;8,9");
        assert_eq!(report.pixels.len(), 2);
        assert_eq!(report.dropped, 4);
        assert!(report.pixels.contains(&Pixel::new(1, 2)));
        assert!(report.pixels.contains(&Pixel::new(8, 9)));
    }

    #[test]
    fn test_parse_drops_off_canvas_and_negative() {
        let pixels = parse_mask("24,0;0,24;-1,3;23,23");
        assert_eq!(pixels.as_slice(), &[Pixel::new(23, 23)]);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let pixels = parse_mask(" 1, 2 ;3 ,4");
        assert_eq!(pixels.len(), 2);
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let pixels = parse_mask("1,1;2,2;1,1");
        assert_eq!(pixels.as_slice(), &[Pixel::new(1, 1), Pixel::new(2, 2)]);
    }

    #[test]
    fn test_serialize_preserves_iteration_order() {
        let pixels = parse_mask("5,5;0,1;0,0");
        assert_eq!(serialize_mask(&pixels), "5,5;0,1;0,0");
        assert_eq!(serialize_mask(&pixels.sorted()), "0,0;0,1;5,5");
    }

    #[test]
    fn test_reparse_is_set_equal() {
        let original = parse_mask("3,4;bad;1,2;3,4;10,11");
        let reparsed = parse_mask(&serialize_mask(&original));
        assert!(reparsed.set_eq(&original));
    }

    #[test]
    fn test_sorted_keeps_membership() {
        let pixels = parse_mask("9,1;0,5;0,2");
        let sorted = pixels.sorted();
        assert!(sorted.set_eq(&pixels));
        assert_eq!(sorted.as_slice()[0], Pixel::new(0, 2));
    }
}
