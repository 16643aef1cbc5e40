//! Read-only trait queries: sprite list, trait table, components, masks
//! and point picking.

use std::process::ExitCode;

use crate::export::copy_with_status;
use crate::grid::format_pct;
use crate::index::ALL_CATEGORIES;

use super::{select_part, system_clipboard, GlobalArgs, Session, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the sprites command.
pub fn run_sprites(global: &GlobalArgs, search: Option<&str>, json: bool) -> ExitCode {
    let session = match Session::load(global, None) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let index = &session.index;
    let ids = index.search(search.unwrap_or(""));

    if json {
        let sprites: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| serde_json::json!({ "sprite_id": id, "records": index.record_count(id) }))
            .collect();
        println!("{}", serde_json::json!({ "sprites": sprites, "categories": index.filter_options() }));
    } else {
        if ids.is_empty() {
            println!("No sprites match.");
        }
        for id in ids {
            println!("{}  ({})", id, index.record_count(id));
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the traits command.
pub fn run_traits(global: &GlobalArgs, sprite: &str, category: Option<&str>, json: bool) -> ExitCode {
    let (_, mut viewer) = match Session::load(global, None).and_then(|s| s.viewer(sprite)) {
        Ok(v) => v,
        Err(code) => return code,
    };
    viewer.change_filter(category.unwrap_or(ALL_CATEGORIES));
    let stats = viewer.stats();

    if json {
        let traits: Vec<serde_json::Value> = viewer.traits().iter().map(|t| t.to_json()).collect();
        let output = serde_json::json!({
            "sprite_id": sprite,
            "category": viewer.category_filter(),
            "trait_count": stats.trait_count,
            "background": stats.background,
            "unique_colours": stats.unique_colours,
            "traits": traits,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!(
        "{}: {} traits, background {}, {} colours",
        sprite,
        stats.trait_count,
        stats.background.as_deref().unwrap_or("—"),
        stats.unique_colours
    );
    if viewer.traits().is_empty() {
        println!("  No traits for this filter.");
    }
    for (i, t) in viewer.traits().iter().enumerate() {
        println!(
            "  [{}] {} / {}  {} px  {}%  {}",
            i,
            t.category(),
            t.variant_hint(),
            t.pixels.len(),
            format_pct(t.pixels.len()),
            t.colour_label()
        );
        let notes = t.display_notes();
        if !notes.is_empty() {
            println!("      {}", notes);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the components command.
pub fn run_components(global: &GlobalArgs, sprite: &str, trait_index: usize, json: bool) -> ExitCode {
    let (_, mut viewer) = match Session::load(global, None).and_then(|s| s.viewer(sprite)) {
        Ok(v) => v,
        Err(code) => return code,
    };
    if let Err(code) = select_part(&mut viewer, trait_index, None) {
        return code;
    }
    let options = viewer.selector_options();

    if json {
        let parts: Vec<serde_json::Value> = options
            .iter()
            .map(|o| serde_json::json!({ "key": o.selector.key(), "label": o.label }))
            .collect();
        println!("{}", serde_json::json!({ "sprite_id": sprite, "trait": trait_index, "options": parts }));
    } else {
        for option in options {
            println!("{:<14} {}", option.selector.key(), option.label);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the mask command.
pub fn run_mask(
    global: &GlobalArgs,
    sprite: &str,
    trait_index: usize,
    select: Option<&str>,
    copy: bool,
) -> ExitCode {
    let mut clipboard = None;
    if copy {
        clipboard = system_clipboard();
        if clipboard.is_none() {
            eprintln!("Error: clipboard support is not available in this build");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    let (_, mut viewer) = match Session::load(global, None).and_then(|s| s.viewer(sprite)) {
        Ok(v) => v,
        Err(code) => return code,
    };
    if let Err(code) = select_part(&mut viewer, trait_index, select) {
        return code;
    }

    let mask = viewer.current_mask();
    if mask.is_empty() {
        eprintln!("{}", viewer.mask_status());
    } else {
        println!("{}", mask);
    }

    if let Some(clipboard) = clipboard.as_deref_mut() {
        if let Some(status) = copy_with_status(clipboard, &mask, "Copied pixel mask!") {
            eprintln!("{}", status);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the pick command.
pub fn run_pick(
    global: &GlobalArgs,
    sprite: &str,
    (x, y): (f64, f64),
    (width, height): (f64, f64),
    category: Option<&str>,
    json: bool,
) -> ExitCode {
    if !(width > 0.0 && height > 0.0) {
        eprintln!("Error: --width and --height must be positive");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let (_, mut viewer) = match Session::load(global, None).and_then(|s| s.viewer(sprite)) {
        Ok(v) => v,
        Err(code) => return code,
    };
    if let Some(category) = category {
        viewer.change_filter(category);
    }

    let cell = crate::overlay::pick_cell(x, y, width, height);
    let trait_ = viewer.pick(x, y, width, height).and_then(|i| viewer.traits().get(i));
    // report the row of the unfiltered `ptv traits` table
    let picked = trait_.and_then(|t| {
        viewer.index().composite_traits(sprite, None).iter().position(|u| u.id == t.id)
    });

    if json {
        let output = serde_json::json!({
            "sprite_id": sprite,
            "cell": cell.map(|p| serde_json::json!({ "row": p.row, "col": p.col })),
            "index": picked,
            "trait": trait_.map(|t| t.to_json()),
        });
        println!("{}", output);
        return ExitCode::from(EXIT_SUCCESS);
    }

    match (cell, trait_) {
        (None, _) => println!("Point ({}, {}) is outside the image", x, y),
        (Some(cell), None) => println!("No trait at {}", cell),
        (Some(cell), Some(t)) => println!(
            "{} -> [{}] {} / {}",
            cell,
            picked.unwrap_or_default(),
            t.category(),
            t.variant_hint()
        ),
    }

    ExitCode::from(EXIT_SUCCESS)
}
