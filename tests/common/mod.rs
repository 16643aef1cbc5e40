//! Shared fixtures for the `ptv` CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

pub const TRAITS_JSON: &str = r##"[
  {"sprite_id": "lady_007", "category": "Background", "variant_hint": "teal", "color_hex": "#008080", "color_name": "teal", "coverage_pct": 0.35, "pixel_mask": "0,0;0,1"},
  {"sprite_id": "lady_007", "category": "Eyes", "variant_hint": "almond", "color_hex": "#112233", "color_name": "navy", "coverage_pct": 0.35, "notes": "left", "pixel_mask": "8,0;8,1"},
  {"sprite_id": "lady_007", "category": "Eyes", "variant_hint": "almond", "color_hex": "#445566", "color_name": "slate", "coverage_pct": "0.35%", "notes": "right", "pixel_mask": "8,1;8,5"},
  {"sprite_id": "lady_007", "category": "Mouth", "variant_hint": "smile", "color_hex": "#ff0000", "color_name": "red", "pixel_mask": ""},
  {"sprite_id": "punk_2", "category": "Hair", "variant_hint": "mohawk", "color_hex": "#00FF00", "color_name": "green", "pixel_mask": "0,5;1,5"}
]"##;

/// Path to the ptv binary built for this test run.
pub fn ptv_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ptv"))
}

/// A scratch project: trait data at `data/trait_suggestions.json` and
/// 24px sprite bitmaps under `data/punks_24px/`.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("should create temp dir");
        let fixture = Self { dir };
        fixture.write("data/trait_suggestions.json", TRAITS_JSON);
        fixture.write_sprite("lady_007", &lady_007());
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("should create fixture dirs");
        }
        fs::write(&path, contents).expect("should write fixture file");
        path
    }

    pub fn write_sprite(&self, sprite_id: &str, image: &RgbaImage) {
        let path = self.path().join("data/punks_24px").join(format!("{}.png", sprite_id));
        fs::create_dir_all(path.parent().expect("sprite path has a parent")).expect("should create sprite dir");
        image.save(&path).expect("should save sprite png");
    }

    /// Run ptv inside the fixture with config discovery confined to it.
    pub fn run(&self, args: &[&str]) -> (String, String, bool) {
        self.run_in(self.path(), args)
    }

    /// Run ptv with `cwd` as the working directory.
    pub fn run_in(&self, cwd: &Path, args: &[&str]) -> (String, String, bool) {
        let output = Command::new(ptv_binary())
            .args(args)
            .current_dir(cwd)
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute ptv");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (stdout, stderr, output.status.success())
    }

    /// Exit code of a ptv run.
    pub fn exit_code(&self, args: &[&str]) -> Option<i32> {
        Command::new(ptv_binary())
            .args(args)
            .current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .output()
            .expect("Failed to execute ptv")
            .status
            .code()
    }
}

/// 24x24 bitmap matching the lady_007 records: teal background cells,
/// a navy and two slate eye cells, everything else transparent.
pub fn lady_007() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(24, 24, Rgba([0, 0, 0, 0]));
    let teal = Rgba([0x00, 0x80, 0x80, 255]);
    let navy = Rgba([0x11, 0x22, 0x33, 255]);
    let slate = Rgba([0x44, 0x55, 0x66, 255]);
    // put_pixel takes (x = col, y = row)
    image.put_pixel(0, 0, teal);
    image.put_pixel(1, 0, teal);
    image.put_pixel(0, 8, navy);
    image.put_pixel(1, 8, slate);
    image.put_pixel(5, 8, slate);
    // nearly transparent, below the default alpha threshold
    image.put_pixel(10, 10, Rgba([255, 255, 255, 8]));
    image
}
