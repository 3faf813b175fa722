//! CLI integration tests for the tileview binary
//!
//! These tests verify end-to-end behavior by running the binary against a game
//! directory laid out in a temporary directory and checking exit codes and output.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the tileview binary built for this test run
fn tileview_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tileview"))
}

/// Run the binary from `dir`, which holds its own tileview.toml
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(tileview_binary())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute tileview")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Lay out `game/gfx/Retro/` with two sheets and `game/gfx/Empty/` without a config.
fn game_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let pack = temp.path().join("game").join("gfx").join("Retro");
    fs::create_dir_all(&pack).unwrap();
    fs::create_dir_all(temp.path().join("game").join("gfx").join("Empty")).unwrap();

    RgbaImage::from_pixel(64, 32, Rgba([255, 0, 0, 255])).save(pack.join("a.png")).unwrap();
    RgbaImage::from_pixel(32, 16, Rgba([0, 0, 255, 255])).save(pack.join("b.png")).unwrap();
    fs::write(
        pack.join("tile_config.json"),
        r#"{
            "tile_info": [{"width": 16, "height": 16}],
            "tiles-new": [
                {"file": "a.png", "tiles": [{"id": "t_grass", "fg": 0}, {"id": "t_wall", "fg": [1, 2]}]},
                {"file": "b.png", "tiles": [{"id": "f_chair", "fg": 9}]},
                {"file": "missing.png", "tiles": []}
            ]
        }"#,
    )
    .unwrap();
    fs::write(temp.path().join("tileview.toml"), "[cdda]\nroot = \"game\"\n").unwrap();
    temp
}

#[test]
fn test_packs_lists_sorted_names() {
    let temp = game_dir();
    let output = run(temp.path(), &["packs"]);

    assert!(output.status.success(), "packs failed: {}", stderr(&output));
    let out = stdout(&output);
    let empty = out.find("Empty").expect("Empty pack listed");
    let retro = out.find("Retro").expect("Retro pack listed");
    assert!(empty < retro);
    assert!(out.contains("(no tile_config.json)"));
}

#[test]
fn test_info_reports_ranges_and_missing_sheet() {
    let temp = game_dir();
    let output = run(temp.path(), &["info", "--pack", "Retro"]);

    assert!(output.status.success(), "info failed: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("0..=7 (8 cells, 4x2 grid)"), "{}", out);
    assert!(out.contains("8..=9 (2 cells, 2x1 grid)"), "{}", out);
    assert!(out.contains("empty (not loaded)"), "{}", out);
    assert!(stderr(&output).contains("Warning:"));
}

#[test]
fn test_info_json() {
    let temp = game_dir();
    let output = run(temp.path(), &["info", "--pack", "Retro", "--json"]);

    assert!(output.status.success());
    let ranges: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(ranges[1]["file"], "b.png");
    assert_eq!(ranges[1]["start"], 8);
    assert_eq!(ranges[2]["end"], 9);
}

#[test]
fn test_strict_fails_on_diagnostics() {
    let temp = game_dir();
    let output = run(temp.path(), &["--strict", "info", "--pack", "Retro"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("strict mode"));
}

#[test]
fn test_show_tile() {
    let temp = game_dir();
    let output = run(temp.path(), &["show", "--pack", "Retro", "--id", "f_chair"]);

    assert!(output.status.success(), "show failed: {}", stderr(&output));
    assert!(stdout(&output).contains("#9 b.png row 0 col 1"), "{}", stdout(&output));
}

#[test]
fn test_show_unknown_tile() {
    let temp = game_dir();
    let output = run(temp.path(), &["show", "--pack", "Retro", "--id", "nope"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Tile 'nope' not found"));
}

#[test]
fn test_list_search() {
    let temp = game_dir();
    let output = run(temp.path(), &["list", "--pack", "Retro", "--search", "T_"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("t_grass"));
    assert!(out.contains("t_wall"));
    assert!(!out.contains("f_chair"));

    let strict_case = run(temp.path(), &["list", "--pack", "Retro", "--search", "T_", "--case-sensitive"]);
    assert!(strict_case.status.success());
    assert!(!stdout(&strict_case).contains("t_grass"));
}

#[test]
fn test_extract_rejects_oversized_spacing() {
    let temp = game_dir();
    let output = run(temp.path(), &["extract", "--pack", "Retro", "--id", "t_wall", "--spacing", "4294967290"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!temp.path().join("t_wall.png").exists());
}

#[test]
fn test_extract_writes_png() {
    let temp = game_dir();
    let output = run(
        temp.path(),
        &["extract", "--pack", "Retro", "--id", "t_wall", "-o", "out/wall.png", "--scale", "2"],
    );

    assert!(output.status.success(), "extract failed: {}", stderr(&output));
    let image = image::open(temp.path().join("out").join("wall.png")).unwrap();
    // two sprites, (16 + 20) * 2 + 10 wide and 16 + 10 tall, then doubled
    assert_eq!((image.width(), image.height()), (164, 52));
}

#[test]
fn test_tileset_path_argument() {
    let temp = game_dir();
    let config = temp.path().join("game").join("gfx").join("Retro").join("tile_config.json");
    let output = run(temp.path(), &["show", config.to_str().unwrap(), "--id", "t_grass"]);

    assert!(output.status.success(), "show failed: {}", stderr(&output));
    assert!(stdout(&output).contains("#0 a.png row 0 col 0"));
}

#[test]
fn test_unknown_pack() {
    let temp = game_dir();
    let output = run(temp.path(), &["info", "--pack", "Empty"]);
    assert_eq!(output.status.code(), Some(1));
}
