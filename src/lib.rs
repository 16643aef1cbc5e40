//! Pixeltraits - trait viewer core for 24x24 pixel-art sprite collections
//!
//! This library provides functionality to:
//! - Decode trait records (category, variant, colour, pixel mask) leniently or strictly
//! - Group colour slices into composite traits and split them into connected components
//! - Map highlights onto displayed sprites and clicks back onto grid cells
//! - Sample sprite palettes and export masks and curation selections

pub mod assets;
pub mod category;
pub mod cli;
pub mod color;
pub mod components;
pub mod config;
pub mod export;
pub mod grid;
pub mod grouping;
pub mod index;
pub mod loader;
pub mod mask;
pub mod models;
pub mod output;
pub mod overlay;
pub mod palette;
pub mod viewer;

#[cfg(feature = "wasm")]
pub mod wasm;
