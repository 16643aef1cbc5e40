//! Palette sampling command

use std::process::ExitCode;

use crate::assets::Tier;
use crate::grid::TOTAL_PIXELS;
use crate::palette::{declared_names, extract_palette};

use super::{GlobalArgs, Session, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the palette command.
pub fn run_palette(global: &GlobalArgs, sprite: &str, alpha_threshold: Option<u8>, json: bool) -> ExitCode {
    let (config, mut viewer) = match Session::load(global, None).and_then(|s| s.viewer(sprite)) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let threshold = alpha_threshold.unwrap_or(config.palette.alpha_threshold);
    let assets = config.assets.to_paths();

    // The viewer hands out a ticket so a result for another sprite is never shown.
    if let Some(ticket) = viewer.begin_palette_request() {
        let loaded = match assets.load(&ticket.sprite_id, Tier::Small) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        if loaded.image.width() as usize * loaded.image.height() as usize != TOTAL_PIXELS {
            log::warn!(
                "{} is {}x{}, not the canonical 24x24",
                loaded.path.display(),
                loaded.image.width(),
                loaded.image.height()
            );
        }
        let names = declared_names(viewer.index().records(sprite));
        let palette = extract_palette(&loaded.image, &names, threshold);
        viewer.apply_palette(&ticket, palette);
    }
    let palette = viewer.palette().unwrap_or_default();

    if json {
        let output = serde_json::json!({
            "sprite_id": sprite,
            "alpha_threshold": threshold,
            "colours": palette,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return ExitCode::from(EXIT_SUCCESS);
    }

    if palette.is_empty() {
        println!("{}: no opaque pixels", sprite);
    }
    for entry in palette {
        println!(
            "{}  {:>4} px  {:>6.2}%  {}",
            entry.hex,
            entry.count,
            entry.coverage_pct,
            entry.name.as_deref().unwrap_or("")
        );
    }

    ExitCode::from(EXIT_SUCCESS)
}
