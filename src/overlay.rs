//! Overlay geometry and rendering
//!
//! Maps grid-space pixel sets onto a sprite shown at an arbitrary on-screen
//! size, and back again for pixel picking. All of the geometry is pure so it
//! can be exercised without a canvas; [`render_overlay`] applies the same
//! plan to an [`RgbaImage`] for PNG output.

use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::color::blend_over;
use crate::grid::{Pixel, GRID_SIZE};
use crate::mask::PixelSet;
use crate::models::CompositeTrait;

/// Per-axis size of one grid cell in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridScale {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl GridScale {
    /// Scale for a sprite rendered at `width × height` screen units.
    pub fn new(width: f64, height: f64) -> Self {
        Self { scale_x: width / GRID_SIZE as f64, scale_y: height / GRID_SIZE as f64 }
    }

    /// Whether either axis collapses to nothing (hidden or unmeasured image).
    pub fn is_degenerate(&self) -> bool {
        !(self.scale_x > 0.0 && self.scale_y > 0.0)
    }

    /// Screen rectangle covered by one grid cell.
    pub fn cell_rect(&self, pixel: Pixel) -> Rect {
        Rect {
            x: pixel.col as f64 * self.scale_x,
            y: pixel.row as f64 * self.scale_y,
            width: self.scale_x,
            height: self.scale_y,
        }
    }
}

/// Axis-aligned rectangle in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Inclusive grid bounds of a pixel set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridBounds {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl GridBounds {
    pub fn of(pixels: &PixelSet) -> Option<Self> {
        let mut iter = pixels.iter();
        let first = iter.next()?;
        let init = Self { min_row: first.row, max_row: first.row, min_col: first.col, max_col: first.col };
        Some(iter.fold(init, |b, p| Self {
            min_row: b.min_row.min(p.row),
            max_row: b.max_row.max(p.row),
            min_col: b.min_col.min(p.col),
            max_col: b.max_col.max(p.col),
        }))
    }

    /// Screen rectangle spanning every cell in the bounds.
    pub fn to_rect(&self, scale: GridScale) -> Rect {
        Rect {
            x: self.min_col as f64 * scale.scale_x,
            y: self.min_row as f64 * scale.scale_y,
            width: (self.max_col - self.min_col + 1) as f64 * scale.scale_x,
            height: (self.max_row - self.min_row + 1) as f64 * scale.scale_y,
        }
    }
}

/// Everything needed to draw one highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPlan {
    pub fills: Vec<Rect>,
    pub bounds: Rect,
}

/// Plan a highlight: one fill per pixel plus a bounding box.
///
/// Returns `None` when there is nothing to draw, in which case the caller
/// should clear the overlay.
pub fn plan_overlay(pixels: &PixelSet, scale: GridScale) -> Option<OverlayPlan> {
    if scale.is_degenerate() {
        return None;
    }
    let bounds = GridBounds::of(pixels)?;
    Some(OverlayPlan {
        fills: pixels.iter().map(|p| scale.cell_rect(*p)).collect(),
        bounds: bounds.to_rect(scale),
    })
}

/// Backing-store sizing for a high-DPI overlay canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    /// Backing store size in device pixels
    pub backing_width: u32,
    pub backing_height: u32,
    /// Layout size in CSS pixels
    pub css_width: f64,
    pub css_height: f64,
    /// Transform `(a, b, c, d, e, f)` to set, not multiply, before each redraw
    pub transform: [f64; 6],
}

impl CanvasSize {
    pub fn for_display(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self {
            backing_width: (width * dpr).round() as u32,
            backing_height: (height * dpr).round() as u32,
            css_width: width,
            css_height: height,
            transform: [dpr, 0.0, 0.0, dpr, 0.0, 0.0],
        }
    }
}

/// Map a click relative to the image's top-left corner to a grid cell.
///
/// Returns `None` for clicks outside the image or when the image has no size.
pub fn pick_cell(rel_x: f64, rel_y: f64, width: f64, height: f64) -> Option<Pixel> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    if rel_x < 0.0 || rel_y < 0.0 || rel_x > width || rel_y > height {
        return None;
    }
    let last = (GRID_SIZE - 1) as f64;
    let col = (rel_x / width * GRID_SIZE as f64).floor().min(last);
    let row = (rel_y / height * GRID_SIZE as f64).floor().min(last);
    Some(Pixel::new(row as u32, col as u32))
}

/// Index of the first trait, in display order, whose footprint contains `pixel`.
pub fn find_trait_at(traits: &[CompositeTrait], pixel: Pixel) -> Option<usize> {
    traits.iter().position(|t| t.pixels.contains(&pixel))
}

/// Colours and stroke width for a rendered highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub fill: Rgba<u8>,
    pub stroke: Rgba<u8>,
    pub line_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill: Rgba([96, 165, 250, 82]),
            stroke: Rgba([14, 165, 233, 242]),
            line_width: 2.8,
        }
    }
}

/// Blend `color` into every image pixel whose centre lies inside `rect`.
fn fill_rect(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (w, h) = image.dimensions();
    let x0 = rect.x.floor().max(0.0) as u32;
    let y0 = rect.y.floor().max(0.0) as u32;
    let x1 = ((rect.x + rect.width).ceil().max(0.0) as u32).min(w);
    let y1 = ((rect.y + rect.height).ceil().max(0.0) as u32).min(h);

    for y in y0..y1 {
        let cy = y as f64 + 0.5;
        if cy < rect.y || cy >= rect.y + rect.height {
            continue;
        }
        for x in x0..x1 {
            let cx = x as f64 + 0.5;
            if cx < rect.x || cx >= rect.x + rect.width {
                continue;
            }
            let blended = blend_over(*image.get_pixel(x, y), color);
            image.put_pixel(x, y, blended);
        }
    }
}

/// Stroke a rectangle outline centred on its edges.
fn stroke_rect(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>, line_width: f64) {
    let lw = line_width.round().max(1.0);
    let half = lw / 2.0;
    let (left, top) = (rect.x - half, rect.y - half);
    let (outer_w, outer_h) = (rect.width + lw, rect.height + lw);

    // top, bottom, then the side bands between them so corners blend once
    fill_rect(image, Rect { x: left, y: top, width: outer_w, height: lw }, color);
    fill_rect(image, Rect { x: left, y: top + outer_h - lw, width: outer_w, height: lw }, color);
    let side_h = (outer_h - 2.0 * lw).max(0.0);
    fill_rect(image, Rect { x: left, y: top + lw, width: lw, height: side_h }, color);
    fill_rect(image, Rect { x: left + outer_w - lw, y: top + lw, width: lw, height: side_h }, color);
}

/// Draw a highlight for `pixels` on top of a copy of `sprite`.
///
/// The sprite may be any size; cells are mapped with the same scale the
/// browser overlay uses. An empty pixel set returns the sprite unchanged.
pub fn render_overlay(sprite: &RgbaImage, pixels: &PixelSet, style: &OverlayStyle) -> RgbaImage {
    let mut out = sprite.clone();
    let scale = GridScale::new(sprite.width() as f64, sprite.height() as f64);
    let Some(plan) = plan_overlay(pixels, scale) else {
        return out;
    };

    for rect in &plan.fills {
        fill_rect(&mut out, *rect, style.fill);
    }
    stroke_rect(&mut out, plan.bounds, style.stroke, style.line_width);
    out
}
