//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use pixelguard_test_support::SyntheticImageBuilder;
use predicates::prelude::*;

/// A working directory with one flat image, plus an empty XDG config home.
fn workspace() -> (tempfile::TempDir, tempfile::TempDir) {
    let work = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::flat_gray()
        .image
        .save(work.path().join("flat.png"))
        .unwrap();
    (work, xdg)
}

fn pixelguard(work: &Path, xdg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pixelguard").unwrap();
    cmd.current_dir(work).env("XDG_CONFIG_HOME", xdg);
    cmd
}

fn write_xdg(xdg: &Path, content: &str) {
    let dir = xdg.join("pixelguard");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_project_config_applies_format() {
    let (work, xdg) = workspace();
    fs::write(work.path().join(".pixelguard.toml"), "[output]\nformat = 'csv'\n").unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["batch", ".", "-q"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("file_path,is_problematic"));
}

#[test]
fn test_cli_overrides_project_config() {
    let (work, xdg) = workspace();
    fs::write(work.path().join(".pixelguard.toml"), "[output]\nformat = 'csv'\n").unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["batch", ".", "-q", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_xdg_config_applies() {
    let (work, xdg) = workspace();
    write_xdg(xdg.path(), "[output]\nformat = 'jsonl'\n");

    pixelguard(work.path(), xdg.path())
        .args(["analyze", "flat.png"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("{\"path\""));
}

#[test]
fn test_project_config_overrides_xdg() {
    let (work, xdg) = workspace();
    write_xdg(xdg.path(), "[output]\nformat = 'jsonl'\n");
    fs::write(work.path().join(".pixelguard.toml"), "[output]\nformat = 'csv'\n").unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["analyze", "flat.png"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("file_path"));
}

#[test]
fn test_config_mode_is_used() {
    let (work, xdg) = workspace();
    // Custom mode with only the ratio detector enabled lets the flat image pass.
    fs::write(work.path().join(".pixelguard.toml"), "[general]\nmode = 'custom'\n").unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["analyze", "flat.png"])
        .env("PXG_DETECTOR_BORDER_FILL_ENABLED", "false")
        .env("PXG_DETECTOR_UNIFORM_COLOR_ENABLED", "false")
        .env("PXG_DETECTOR_BACKGROUND_ENABLED", "false")
        .assert()
        .code(0);
}

#[test]
fn test_config_recursive() {
    let (work, xdg) = workspace();
    let nested = work.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::rename(work.path().join("flat.png"), nested.join("flat.png")).unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["batch", ".", "-q"])
        .assert()
        .code(0);

    fs::write(work.path().join(".pixelguard.toml"), "[general]\nrecursive = true\n").unwrap();
    pixelguard(work.path(), xdg.path())
        .args(["batch", ".", "-q"])
        .assert()
        .code(1);
}

#[test]
fn test_invalid_config_value_warns() {
    let (work, xdg) = workspace();
    fs::write(work.path().join(".pixelguard.toml"), "[output]\nformat = 'xml'\n").unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["analyze", "flat.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("warning: output.format"))
        .stdout(predicate::str::contains("Status: PROBLEMATIC"));
}

#[test]
fn test_malformed_config_is_ignored() {
    let (work, xdg) = workspace();
    fs::write(work.path().join(".pixelguard.toml"), "[output\nformat = 'csv'\n").unwrap();

    pixelguard(work.path(), xdg.path())
        .args(["analyze", "flat.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"))
        .stdout(predicate::str::contains("Status: PROBLEMATIC"));
}
