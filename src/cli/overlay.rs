//! Highlight rendering command

use std::path::Path;
use std::process::ExitCode;

use crate::assets::Tier;
use crate::output::{save_png, scale_image};
use crate::overlay::render_overlay;

use super::{select_part, GlobalArgs, Session, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the overlay command.
pub fn run_overlay(
    global: &GlobalArgs,
    sprite: &str,
    trait_index: usize,
    select: Option<&str>,
    scale: Option<u32>,
    output: &Path,
) -> ExitCode {
    let (config, mut viewer) = match Session::load(global, scale).and_then(|s| s.viewer(sprite)) {
        Ok(v) => v,
        Err(code) => return code,
    };
    if let Err(code) = select_part(&mut viewer, trait_index, select) {
        return code;
    }

    let loaded = match config.assets.to_paths().load(sprite, Tier::Small) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let base = match scale_image(loaded.image, config.overlay.scale) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let image = match viewer.highlight() {
        Some(highlight) => render_overlay(&base, &highlight.pixels, &config.overlay.style()),
        None => {
            eprintln!("Warning: {}", viewer.mask_status());
            base
        }
    };

    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved {}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}
