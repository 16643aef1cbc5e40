//! Configuration schema types for `ptv.toml`
//!
//! Every section and field is optional; missing values take the defaults
//! below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assets::AssetPaths;
use crate::color::parse_color;
use crate::overlay::OverlayStyle;
use crate::palette::DEFAULT_ALPHA_THRESHOLD;

/// Trait data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON array of trait records
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Reject the file on any decode warning
    #[serde(default)]
    pub strict: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: default_data_path(), strict: false }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/trait_suggestions.json")
}

/// Sprite bitmap locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_assets_base")]
    pub base: PathBuf,
    /// Directory of the canonical 24px bitmaps
    #[serde(default = "default_small_tier")]
    pub small_tier: String,
    /// Directory of the upscaled viewing bitmaps
    #[serde(default = "default_large_tier")]
    pub large_tier: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base: default_assets_base(),
            small_tier: default_small_tier(),
            large_tier: default_large_tier(),
        }
    }
}

fn default_assets_base() -> PathBuf {
    PathBuf::from("data")
}

fn default_small_tier() -> String {
    "punks_24px".to_string()
}

fn default_large_tier() -> String {
    "punks_512px".to_string()
}

impl AssetsConfig {
    pub fn to_paths(&self) -> AssetPaths {
        AssetPaths {
            base: self.base.clone(),
            small_tier: self.small_tier.clone(),
            large_tier: self.large_tier.clone(),
        }
    }
}

/// Palette sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Pixels with alpha below this are skipped
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self { alpha_threshold: default_alpha_threshold() }
    }
}

fn default_alpha_threshold() -> u8 {
    DEFAULT_ALPHA_THRESHOLD
}

/// Largest upscale factor accepted for overlays.
pub const MAX_OVERLAY_SCALE: u32 = 64;

/// Highlight rendering for `ptv overlay`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Fill colour, `#RRGGBBAA` or shorter hex
    #[serde(default = "default_fill")]
    pub fill: String,
    /// Bounding box stroke colour
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Upscale factor applied to the sprite before drawing
    #[serde(default = "default_overlay_scale")]
    pub scale: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            stroke: default_stroke(),
            line_width: default_line_width(),
            scale: default_overlay_scale(),
        }
    }
}

fn default_fill() -> String {
    "#60a5fa52".to_string()
}

fn default_stroke() -> String {
    "#0ea5e9f2".to_string()
}

fn default_line_width() -> f64 {
    2.8
}

fn default_overlay_scale() -> u32 {
    20
}

impl OverlayConfig {
    /// Resolve the configured colours. Call [`PtvConfig::validate`] first;
    /// unparseable colours fall back to the defaults.
    pub fn style(&self) -> OverlayStyle {
        let defaults = OverlayStyle::default();
        OverlayStyle {
            fill: parse_color(&self.fill).unwrap_or(defaults.fill),
            stroke: parse_color(&self.stroke).unwrap_or(defaults.stroke),
            line_width: self.line_width,
        }
    }
}

/// Root configuration (`ptv.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtvConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// A single config validation problem
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl PtvConfig {
    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.data.path.as_os_str().is_empty() {
            push("data.path", "must be a non-empty path".to_string());
        }
        if self.assets.small_tier.is_empty() {
            push("assets.small_tier", "must be a non-empty directory name".to_string());
        }
        if self.assets.large_tier.is_empty() {
            push("assets.large_tier", "must be a non-empty directory name".to_string());
        }
        if let Err(e) = parse_color(&self.overlay.fill) {
            push("overlay.fill", e.to_string());
        }
        if let Err(e) = parse_color(&self.overlay.stroke) {
            push("overlay.stroke", e.to_string());
        }
        if !self.overlay.line_width.is_finite() || self.overlay.line_width <= 0.0 {
            push("overlay.line_width", "must be a positive number".to_string());
        }
        if self.overlay.scale == 0 || self.overlay.scale > MAX_OVERLAY_SCALE {
            push("overlay.scale", format!("must be between 1 and {}", MAX_OVERLAY_SCALE));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PtvConfig = toml::from_str("").unwrap();
        assert_eq!(config, PtvConfig::default());
        assert_eq!(config.data.path, PathBuf::from("data/trait_suggestions.json"));
        assert_eq!(config.palette.alpha_threshold, 16);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml_str = r##"
[data]
path = "site/traits.json"
strict = true

[assets]
base = "site"
small_tier = "tiny"
large_tier = "huge"

[palette]
alpha_threshold = 128

[overlay]
fill = "#ff000080"
stroke = "#00ff00"
line_width = 1.0
scale = 4
"##;
        let config: PtvConfig = toml::from_str(toml_str).unwrap();
        assert!(config.data.strict);
        assert_eq!(config.assets.to_paths().large_tier, "huge");
        assert_eq!(config.palette.alpha_threshold, 128);

        let style = config.overlay.style();
        assert_eq!(style.fill, Rgba([255, 0, 0, 128]));
        assert_eq!(style.stroke, Rgba([0, 255, 0, 255]));
        assert_eq!(style.line_width, 1.0);
    }

    #[test]
    fn test_default_style_matches_overlay_default() {
        assert_eq!(OverlayConfig::default().style(), OverlayStyle::default());
    }

    #[test]
    fn test_validation_collects_all_problems() {
        let mut config = PtvConfig::default();
        config.overlay.fill = "blue".to_string();
        config.overlay.scale = 0;
        config.overlay.line_width = -1.0;
        config.assets.small_tier.clear();

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["assets.small_tier", "overlay.fill", "overlay.line_width", "overlay.scale"]
        );

        let config: PtvConfig = toml::from_str("[overlay]\nscale = 200000000").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "overlay.scale");
        assert_eq!(errors[0].message, "must be between 1 and 64");
    }

    #[test]
    fn test_scale_upper_bound_inclusive() {
        let mut config = PtvConfig::default();
        config.overlay.scale = MAX_OVERLAY_SCALE;
        assert!(config.is_valid());
        config.overlay.scale = MAX_OVERLAY_SCALE + 1;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: PtvConfig = toml::from_str("[overlay]\nscale = 8").unwrap();
        assert_eq!(config.overlay.scale, 8);
        assert_eq!(config.overlay.fill, "#60a5fa52");
    }
}
