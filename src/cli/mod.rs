//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod browse;
mod export;
mod overlay;
mod palette;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::components::ComponentSelector;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, PtvConfig, MAX_OVERLAY_SCALE};
use crate::export::Clipboard;
use crate::index::TraitIndex;
use crate::loader::load_trait_data;
use crate::viewer::ViewerState;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Pixeltraits - inspect trait layers of 24x24 pixel-art sprites
#[derive(Parser)]
#[command(name = "ptv")]
#[command(about = "Pixeltraits - inspect trait layers of 24x24 pixel-art sprites")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Trait data file (JSON array of trait records)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Base directory of the sprite bitmap tiers
    #[arg(long, global = true, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Config file (default: discover ptv.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Strict mode: treat data warnings as errors
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sprite ids with their trait record counts
    Sprites {
        /// Only show ids containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the composite traits of a sprite
    Traits {
        /// Sprite id
        #[arg(long)]
        sprite: String,

        /// Only show traits of this category ("All" for every category)
        #[arg(long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the connected components of a trait
    Components {
        /// Sprite id
        #[arg(long)]
        sprite: String,

        /// Trait index as listed by `ptv traits`
        #[arg(long = "trait", value_name = "N")]
        trait_index: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the pixel mask of a trait or one of its parts
    Mask {
        /// Sprite id
        #[arg(long)]
        sprite: String,

        /// Trait index as listed by `ptv traits`
        #[arg(long = "trait", value_name = "N")]
        trait_index: usize,

        /// Part to select: -1 (entire trait), component-N, slice-N
        #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
        select: Option<String>,

        /// Also copy the mask to the system clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Find the trait under a point on a displayed sprite
    Pick {
        /// Sprite id
        #[arg(long)]
        sprite: String,

        /// X offset from the image's left edge
        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        /// Y offset from the image's top edge
        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        /// Displayed image width
        #[arg(long)]
        width: f64,

        /// Displayed image height
        #[arg(long)]
        height: f64,

        /// Only consider traits of this category
        #[arg(long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sample the colours present in a sprite bitmap
    Palette {
        /// Sprite id
        #[arg(long)]
        sprite: String,

        /// Alpha below which pixels are skipped (default from config)
        #[arg(long)]
        alpha_threshold: Option<u8>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a sprite with a trait highlighted to PNG
    Overlay {
        /// Sprite id
        #[arg(long)]
        sprite: String,

        /// Trait index as listed by `ptv traits`
        #[arg(long = "trait", value_name = "N")]
        trait_index: usize,

        /// Part to highlight: -1 (entire trait), component-N, slice-N
        #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
        select: Option<String>,

        /// Scale the sprite by integer factor before drawing (1-64)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_OVERLAY_SCALE)))]
        scale: Option<u32>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export a curation selection as JSON
    ExportSelection {
        /// Alternate ids to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,

        /// Canonical ids to remove (comma-separated)
        #[arg(long, value_delimiter = ',')]
        remove: Vec<String>,

        /// Directory to save selected-variant-punks.json in
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Also copy the JSON to the system clipboard
        #[arg(long)]
        copy: bool,
    },
}

/// Loaded configuration and trait data for a command.
pub(crate) struct Session {
    pub config: PtvConfig,
    pub index: TraitIndex,
}

impl Session {
    /// Load config and trait data, printing any error.
    pub fn load(global: &GlobalArgs, scale: Option<u32>) -> Result<Self, ExitCode> {
        let mut config = match load_config(global.config.as_deref()) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        };
        let overrides = CliOverrides {
            data: global.data.clone(),
            assets: global.assets.clone(),
            strict: global.strict.then_some(true),
            scale,
        };
        merge_cli_overrides(&mut config, &overrides);

        let loaded = match load_trait_data(&config.data.path, config.data.strict) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        };
        for warning in &loaded.warnings {
            eprintln!("Warning: {}", warning);
        }

        Ok(Self { config, index: TraitIndex::new(loaded.records) })
    }

    /// Viewer with `sprite` selected, or an error for unknown ids.
    pub fn viewer(self, sprite: &str) -> Result<(PtvConfig, ViewerState), ExitCode> {
        let mut viewer = ViewerState::new(self.index);
        if !viewer.select_sprite(sprite) {
            eprintln!("Error: sprite '{}' not found", sprite);
            return Err(ExitCode::from(EXIT_ERROR));
        }
        Ok((self.config, viewer))
    }
}

/// Select trait `index` and the part named by `select` in `viewer`.
pub(crate) fn select_part(viewer: &mut ViewerState, index: usize, select: Option<&str>) -> Result<(), ExitCode> {
    if !viewer.select_trait(index) {
        eprintln!(
            "Error: trait index {} out of range ({} traits for '{}')",
            index,
            viewer.traits().len(),
            viewer.selected_sprite().unwrap_or_default()
        );
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    if let Some(key) = select {
        viewer.select_component(ComponentSelector::parse(key));
    }
    Ok(())
}

/// The system clipboard, when compiled in.
#[cfg(feature = "clipboard")]
pub(crate) fn system_clipboard() -> Option<Box<dyn Clipboard>> {
    Some(Box::new(crate::export::SystemClipboard))
}

#[cfg(not(feature = "clipboard"))]
pub(crate) fn system_clipboard() -> Option<Box<dyn Clipboard>> {
    None
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    let global = &cli.global;

    match cli.command {
        Commands::Sprites { search, json } => browse::run_sprites(global, search.as_deref(), json),
        Commands::Traits { sprite, category, json } => {
            browse::run_traits(global, &sprite, category.as_deref(), json)
        }
        Commands::Components { sprite, trait_index, json } => {
            browse::run_components(global, &sprite, trait_index, json)
        }
        Commands::Mask { sprite, trait_index, select, copy } => {
            browse::run_mask(global, &sprite, trait_index, select.as_deref(), copy)
        }
        Commands::Pick { sprite, x, y, width, height, category, json } => {
            browse::run_pick(global, &sprite, (x, y), (width, height), category.as_deref(), json)
        }
        Commands::Palette { sprite, alpha_threshold, json } => {
            palette::run_palette(global, &sprite, alpha_threshold, json)
        }
        Commands::Overlay { sprite, trait_index, select, scale, output } => {
            overlay::run_overlay(global, &sprite, trait_index, select.as_deref(), scale, &output)
        }
        Commands::ExportSelection { include, remove, output, copy } => {
            export::run_export_selection(include, remove, output.as_deref(), copy)
        }
    }
}
