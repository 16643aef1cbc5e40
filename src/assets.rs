//! Sprite bitmap lookup
//!
//! Bitmaps live at `{base}/{tier}/{sprite_id}.png` in two resolution tiers:
//! a small canonical tier used for pixel sampling and a large tier for
//! viewing. Loading the large tier falls back to the small one.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

/// Error when no tier of a sprite bitmap could be loaded.
#[derive(Debug, Error)]
#[error("sprite image unavailable for '{sprite_id}' (tried {})", .tried.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
pub struct AssetError {
    pub sprite_id: String,
    pub tried: Vec<PathBuf>,
}

/// Which resolution tier to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Small,
    Large,
}

/// Location of sprite bitmaps on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPaths {
    pub base: PathBuf,
    pub small_tier: String,
    pub large_tier: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            base: PathBuf::from("data"),
            small_tier: "punks_24px".to_string(),
            large_tier: "punks_512px".to_string(),
        }
    }
}

/// A decoded sprite bitmap and the tier it came from.
#[derive(Debug, Clone)]
pub struct LoadedSprite {
    pub image: RgbaImage,
    pub tier: Tier,
    pub path: PathBuf,
}

impl AssetPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into(), ..Self::default() }
    }

    pub fn sprite_path(&self, sprite_id: &str, tier: Tier) -> PathBuf {
        let dir = match tier {
            Tier::Small => &self.small_tier,
            Tier::Large => &self.large_tier,
        };
        self.base.join(dir).join(format!("{}.png", sprite_id))
    }

    /// Tiers to try, in order, for a preferred tier.
    pub fn fallback_chain(preferred: Tier) -> &'static [Tier] {
        match preferred {
            Tier::Large => &[Tier::Large, Tier::Small],
            Tier::Small => &[Tier::Small],
        }
    }

    /// Load a sprite bitmap, falling back from the large tier to the small one.
    pub fn load(&self, sprite_id: &str, preferred: Tier) -> Result<LoadedSprite, AssetError> {
        let mut tried = Vec::new();
        for &tier in Self::fallback_chain(preferred) {
            let path = self.sprite_path(sprite_id, tier);
            match open_rgba(&path) {
                Ok(image) => return Ok(LoadedSprite { image, tier, path }),
                Err(e) => {
                    log::warn!("could not load {}: {}", path.display(), e);
                    tried.push(path);
                }
            }
        }
        Err(AssetError { sprite_id: sprite_id.to_string(), tried })
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage, image::ImageError> {
    Ok(image::open(path)?.to_rgba8())
}
