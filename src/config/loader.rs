//! Configuration loading and discovery for `ptv.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PtvConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "ptv.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse ptv.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override trait data path
    pub data: Option<PathBuf>,
    /// Override sprite bitmap base directory
    pub assets: Option<PathBuf>,
    /// Enable strict decoding
    pub strict: Option<bool>,
    /// Override overlay upscale factor
    pub scale: Option<u32>,
}

/// Find ptv.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for ptv.toml
/// 2. Check XDG_CONFIG_HOME/pixeltraits/ptv.toml (or ~/.config/pixeltraits/ptv.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find ptv.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pixeltraits").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find ptv.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a ptv.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
///
/// Relative paths inside a discovered file are resolved against the
/// directory containing it.
pub fn load_config(path: Option<&Path>) -> Result<PtvConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            let mut config = load_config_file(&p)?;
            if let Some(root) = project_root(&p) {
                config.data.path = resolve_path(root, &config.data.path);
                config.assets.base = resolve_path(root, &config.assets.base);
            }
            Ok(config)
        }
        None => Ok(PtvConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<PtvConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PtvConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut PtvConfig, overrides: &CliOverrides) {
    if let Some(ref data) = overrides.data {
        config.data.path = data.clone();
    }
    if let Some(ref assets) = overrides.assets {
        config.assets.base = assets.clone();
    }
    if let Some(strict) = overrides.strict {
        config.data.strict = strict;
    }
    if let Some(scale) = overrides.scale {
        config.overlay.scale = scale;
    }
}

/// Directory containing a config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
