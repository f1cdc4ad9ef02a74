//! CLI integration tests for the `spritec` binary.
//!
//! Runs the built binary against PNGs written into a temp directory and
//! checks the generated files, exit codes and summaries.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn spritec_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_spritec"))
}

/// Run spritec in `dir` and return (stdout, stderr, exit code).
fn run_in(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(spritec_binary())
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".xdg"))
        .args(args)
        .output()
        .expect("Failed to execute spritec");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

/// Write a two-color checkerboard PNG.
fn write_checker(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    img.save(path).unwrap();
}

#[test]
fn test_convert_writes_pair_next_to_input() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("foo.png"), 16, 16);

    let (stdout, stderr, code) = run_in(temp.path(), &["convert", "foo.png"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("foo.c"));

    let source = std::fs::read_to_string(temp.path().join("foo.c")).unwrap();
    let header = std::fs::read_to_string(temp.path().join("foo.h")).unwrap();
    assert!(source.starts_with("const unsigned short fooBitmap[256] __attribute__((aligned(4)))=\n{\n\t0x7FFF,0x0000,"));
    assert_eq!(source.matches("0x").count(), 256);
    assert!(header.starts_with("#ifndef FOO_H\n#define FOO_H\n\n#define fooTilesLen 256\n"));
}

#[test]
fn test_convert_indexed_tiled_to_output_dir() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("hero.png"), 16, 8);

    let (_, stderr, code) = run_in(
        temp.path(),
        &["convert", "hero.png", "-o", "gen", "--format", "indexed4", "--layout", "tiled", "--name", "player"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let source = std::fs::read_to_string(temp.path().join("gen/player.c")).unwrap();
    let header = std::fs::read_to_string(temp.path().join("gen/player.h")).unwrap();
    assert!(source.contains("playerPal[2]"));
    assert!(header.contains("#define playerPalLen 4\n"));
}

#[test]
fn test_convert_json_summary() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("a.png"), 8, 8);
    write_checker(&temp.path().join("b.png"), 12, 4);

    let (stdout, stderr, code) = run_in(temp.path(), &["convert", "a.png", "b.png", "--json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entries = summary.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["base_name"], "a");
    assert_eq!(entries[0]["tiles"], 1);
    assert_eq!(entries[1]["width"], 12);
    assert!(entries[1]["tiles"].is_null());
}

#[test]
fn test_convert_name_with_many_inputs_is_usage_error() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("a.png"), 8, 8);
    write_checker(&temp.path().join("b.png"), 8, 8);

    let (_, stderr, code) = run_in(temp.path(), &["convert", "a.png", "b.png", "--name", "x"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("--name"));
}

#[test]
fn test_convert_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) = run_in(temp.path(), &["convert", "missing.png"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("missing.png"));
}

#[test]
fn test_convert_tiled_rejects_odd_size() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("odd.png"), 10, 8);
    let (_, stderr, code) = run_in(temp.path(), &["convert", "odd.png", "--layout", "tiled"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("multiples of 8"));
    assert!(!temp.path().join("odd.c").exists());
}

#[test]
fn test_encode_roundtrips_pixels() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("in.png"), 8, 8);

    let (_, stderr, code) = run_in(temp.path(), &["encode", "in.png", "-o", "out/copy.png"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let original = image::open(temp.path().join("in.png")).unwrap().to_rgba8();
    let copy = image::open(temp.path().join("out/copy.png")).unwrap().to_rgba8();
    assert_eq!(original, copy);
}

#[test]
fn test_encode_unknown_extension() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("in.png"), 8, 8);
    let (_, _, code) = run_in(temp.path(), &["encode", "in.png", "-o", "out.tga"]);
    assert_eq!(code, 2);
}

#[test]
fn test_build_uses_project_config() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("spritec.toml"),
        "[project]\nname = \"game\"\nsrc = \"gfx\"\nout = \"gen\"\n\n[emit]\nformat = \"indexed4\"\n\n[palette]\ncolors = [\"#000000\", \"#FFFFFF\"]\n",
    )
    .unwrap();
    write_checker(&temp.path().join("gfx/hero.png"), 8, 8);
    write_checker(&temp.path().join("gfx/ui/icon.png"), 8, 8);

    let (stdout, stderr, code) = run_in(temp.path(), &["build"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Built 2 image(s)"));

    let hero = std::fs::read_to_string(temp.path().join("gen/hero.c")).unwrap();
    // white = 1, black = 0 in the configured palette
    assert!(hero.contains("\t0x0101,0x0101,0x1010,0x1010,"));
    assert!(hero.contains("heroPal[2] __attribute__((aligned(4)))=\n{\n\t0x0000,0x7FFF,\n};"));
    assert!(temp.path().join("gen/ui/icon.h").exists());
}

#[test]
fn test_build_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("spritec.toml"), "[project]\nname = \"game\"\n").unwrap();
    write_checker(&temp.path().join("assets/a.png"), 8, 8);

    let (stdout, _, code) = run_in(temp.path(), &["build", "--dry-run"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Images: 1"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_build_missing_source_dir() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("spritec.toml"), "[project]\nname = \"game\"\n").unwrap();
    let (_, stderr, code) = run_in(temp.path(), &["build"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Source directory not found"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("spritec.toml"), "[project]\nname = \"\"\n").unwrap();
    write_checker(&temp.path().join("a.png"), 8, 8);
    let (_, stderr, code) = run_in(temp.path(), &["convert", "a.png"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("project.name"));
}

#[test]
fn test_info_json() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("c.png"), 16, 8);
    let (stdout, _, code) = run_in(temp.path(), &["info", "c.png", "--json"]);
    assert_eq!(code, 0);
    let info: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(info["width"], 16);
    assert_eq!(info["tiles"], 2);
    assert_eq!(info["distinct_colors"], 2);
}

#[test]
fn test_build_rejects_sources_sharing_a_stem() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("spritec.toml"),
        "[project]\nname = \"game\"\nsrc = \"gfx\"\nout = \"gen\"\n",
    )
    .unwrap();
    write_checker(&temp.path().join("gfx/hero.png"), 8, 8);
    write_checker(&temp.path().join("gfx/hero.bmp"), 16, 16);
    write_checker(&temp.path().join("gfx/coin.png"), 8, 8);

    let (stdout, stderr, code) = run_in(temp.path(), &["build"]);
    assert_eq!(code, 1, "stdout: {}", stdout);
    assert!(stderr.contains("more than one source"), "stderr: {}", stderr);
    assert!(stderr.contains("hero.png") && stderr.contains("hero.bmp"));
    assert!(stderr.contains("Built 1 image(s), 2 failed"));
    assert!(temp.path().join("gen/coin.c").exists());
    assert!(!temp.path().join("gen/hero.c").exists());
    assert!(!temp.path().join("gen/hero.h").exists());
}

#[test]
fn test_convert_rejects_inputs_sharing_an_output() {
    let temp = TempDir::new().unwrap();
    write_checker(&temp.path().join("a/foo.png"), 8, 8);
    write_checker(&temp.path().join("b/foo.png"), 16, 16);

    let (_, stderr, code) = run_in(temp.path(), &["convert", "a/foo.png", "b/foo.png", "-o", "out"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("more than one source"), "stderr: {}", stderr);
    assert!(!temp.path().join("out/foo.c").exists());

    // same stems in separate output directories are fine
    let (_, stderr, code) = run_in(temp.path(), &["convert", "a/foo.png", "b/foo.png"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(temp.path().join("a/foo.c").exists());
    assert!(temp.path().join("b/foo.h").exists());
}
