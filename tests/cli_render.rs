//! CLI integration tests for the bitmap commands: palette and overlay.

mod common;

use common::{lady_007, Fixture};
use image::Rgba;

// ============================================================================
// palette
// ============================================================================

#[test]
fn test_palette_sorted_by_count_then_hex() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["palette", "--sprite", "lady_007", "--json"]);
    assert!(ok, "palette should succeed");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let colours = json["colours"].as_array().expect("colours array");
    let hexes: Vec<&str> = colours.iter().filter_map(|c| c["hex"].as_str()).collect();
    assert_eq!(hexes, vec!["#008080", "#445566", "#112233"]);
    assert_eq!(colours[0]["count"], 2);
    assert_eq!(colours[0]["name"], "teal");
    assert_eq!(colours[2]["name"], "navy");
    assert_eq!(json["alpha_threshold"], 16);
}

#[test]
fn test_palette_text_output() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["palette", "--sprite", "lady_007"]);
    assert!(ok);
    assert_eq!(stdout.lines().next(), Some("#008080     2 px    0.35%  teal"));
}

#[test]
fn test_palette_alpha_threshold_flag() {
    let fixture = Fixture::new();
    let (stdout, _, ok) = fixture.run(&["palette", "--sprite", "lady_007", "--alpha-threshold", "5", "--json"]);
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let colours = json["colours"].as_array().expect("colours array");
    assert_eq!(colours.len(), 4);
    assert!(colours.iter().any(|c| c["hex"] == "#ffffff" && c["name"].is_null()));
}

#[test]
fn test_palette_missing_bitmap() {
    let fixture = Fixture::new();
    let (_, stderr, ok) = fixture.run(&["palette", "--sprite", "punk_2"]);
    assert!(!ok);
    assert!(stderr.contains("sprite image unavailable for 'punk_2'"), "got: {}", stderr);
}

// ============================================================================
// overlay
// ============================================================================

#[test]
fn test_overlay_writes_scaled_png() {
    let fixture = Fixture::new();
    let (stdout, _, ok) =
        fixture.run(&["overlay", "--sprite", "lady_007", "--trait", "1", "--scale", "10", "-o", "out/eyes.png"]);
    assert!(ok, "overlay should succeed");
    assert!(stdout.starts_with("Saved "));

    let image = image::open(fixture.path().join("out/eyes.png")).expect("png written").to_rgba8();
    assert_eq!(image.dimensions(), (240, 240));

    // highlighted cell (8,5) is tinted, an empty cell far away is untouched
    let slate = *lady_007().get_pixel(5, 8);
    assert_ne!(*image.get_pixel(55, 85), slate);
    assert_eq!(*image.get_pixel(200, 200), Rgba([0, 0, 0, 0]));
}

#[test]
fn test_overlay_default_scale_from_config() {
    let fixture = Fixture::new();
    let (_, _, ok) = fixture.run(&["overlay", "--sprite", "lady_007", "--trait", "0", "-o", "bg.png"]);
    assert!(ok);
    let image = image::open(fixture.path().join("bg.png")).expect("png written");
    assert_eq!((image.width(), image.height()), (480, 480));
}

#[test]
fn test_overlay_empty_trait_writes_plain_sprite() {
    let fixture = Fixture::new();
    let (_, stderr, ok) =
        fixture.run(&["overlay", "--sprite", "lady_007", "--trait", "2", "--scale", "1", "-o", "mouth.png"]);
    assert!(ok);
    assert!(stderr.contains("No pixel data available"));
    let image = image::open(fixture.path().join("mouth.png")).expect("png written").to_rgba8();
    assert_eq!(image, lady_007());
}

#[test]
fn test_overlay_rejects_zero_scale() {
    let fixture = Fixture::new();
    let code = fixture.exit_code(&["overlay", "--sprite", "lady_007", "--trait", "1", "--scale", "0", "-o", "x.png"]);
    assert_eq!(code, Some(2));
}
