//! Sprite grid geometry
//!
//! Every sprite in the collection is a fixed 24×24 grid. Coverage figures are
//! always expressed against the full 576-pixel canvas.

use serde::{Deserialize, Serialize};

/// Width and height of a sprite in grid cells.
pub const GRID_SIZE: u32 = 24;

/// Number of cells on the sprite canvas.
pub const TOTAL_PIXELS: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// A single grid cell, addressed by row then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pixel {
    pub row: u32,
    pub col: u32,
}

impl Pixel {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Whether the cell lies on the sprite canvas.
    pub fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// The four orthogonal neighbours that stay on the non-negative quadrant.
    ///
    /// Neighbours past the far edge are still returned; callers only look them
    /// up in a pixel set, so they never match.
    pub fn neighbours(&self) -> impl Iterator<Item = Pixel> {
        let Pixel { row, col } = *self;
        [
            Some(Pixel::new(row + 1, col)),
            row.checked_sub(1).map(|r| Pixel::new(r, col)),
            Some(Pixel::new(row, col + 1)),
            col.checked_sub(1).map(|c| Pixel::new(row, c)),
        ]
        .into_iter()
        .flatten()
    }
}

impl std::fmt::Display for Pixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Round to two decimal places, the precision used for every displayed percentage.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of the sprite canvas covered by `count` pixels, rounded to two decimals.
pub fn coverage_pct(count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round2(count as f64 / TOTAL_PIXELS as f64 * 100.0)
}

/// Format a percentage of the canvas with exactly two decimals (`"3.13"`).
pub fn format_pct(count: usize) -> String {
    format!("{:.2}", count as f64 / TOTAL_PIXELS as f64 * 100.0)
}
