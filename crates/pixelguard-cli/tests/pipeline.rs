//! Pipeline integration tests using synthetic images.
//!
//! Tests the full analysis pipeline with programmatically generated test images.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use pixelguard_core::ImageInfo;
use pixelguard_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use serde_json::Value;

fn pixelguard() -> Command {
    let mut cmd = Command::cargo_bin("pixelguard").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/pixelguard-test-xdg");
    cmd
}

/// Create a temporary directory with synthetic test images.
fn create_test_images(images: Vec<(&str, ImageInfo)>) -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().unwrap();

    for (name, info) in images {
        let path = temp_dir.path().join(name);
        info.image.save(&path).unwrap();
    }

    temp_dir
}

fn batch_json(dir: &std::path::Path, extra: &[&str]) -> (Option<i32>, Value) {
    let output = pixelguard()
        .arg("batch")
        .arg(dir)
        .args(["--format", "json", "-q"])
        .args(extra)
        .output()
        .unwrap();
    let parsed = serde_json::from_slice(&output.stdout).unwrap();
    (output.status.code(), parsed)
}

// === Single Image ===

#[test]
fn test_clean_image_passes() {
    let dir = create_test_images(vec![("clean.png", SyntheticImageBuilder::noise(400, 300, 5))]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("clean.png"))
        .assert()
        .code(0)
        .stdout(
            predicate::str::contains("Status: OK")
                .and(predicate::str::contains("border_fill: PASSED")),
        );
}

#[test]
fn test_black_border_is_flagged() {
    let dir = create_test_images(vec![(
        "bordered.png",
        SyntheticImageBuilder::black_top_border(400, 300, 30),
    )]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("bordered.png"))
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("Status: PROBLEMATIC")
                .and(predicate::str::contains("Top border has black fill: 100.0%")),
        );
}

#[test]
fn test_white_border_passes() {
    let dir = create_test_images(vec![(
        "white.png",
        SyntheticImageBuilder::white_bottom_border(400, 300, 30),
    )]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("white.png"))
        .assert()
        .code(0)
        .stdout(
            predicate::str::contains("Status: OK")
                .and(predicate::str::contains("white fill").not()),
        );
}

#[test]
fn test_flat_image_is_uniform() {
    let dir = create_test_images(vec![("flat.png", SyntheticImageBuilder::flat_gray())]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("flat.png"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("uniform color (threshold: 85.0%)"));
}

#[test]
fn test_unexpected_ratio_is_flagged() {
    let dir = create_test_images(vec![("wide.png", SyntheticImageBuilder::noise(600, 300, 9))]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("wide.png"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("doesn't match any target ratios"));
}

#[test]
fn test_ratio_override_accepts_image() {
    let dir = create_test_images(vec![("wide.png", SyntheticImageBuilder::noise(600, 300, 9))]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("wide.png"))
        .arg("--target-ratios")
        .arg("2:1")
        .assert()
        .code(0);
}

#[test]
fn test_min_dimension_override() {
    let dir = create_test_images(vec![("clean.png", SyntheticImageBuilder::noise(400, 300, 5))]);

    pixelguard()
        .arg("analyze")
        .arg(dir.path().join("clean.png"))
        .arg("--min-width")
        .arg("500")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Width 400 is below minimum 500"));
}

// === Batch ===

#[test]
fn test_batch_mixed_directory() {
    let dir = create_test_images(vec![
        ("a_clean.png", SyntheticImageBuilder::noise(400, 300, 1)),
        ("b_bordered.png", SyntheticImageBuilder::letterboxed(400, 300, 30)),
        ("c_flat.png", SyntheticImageBuilder::flat_gray()),
    ]);

    let (code, report) = batch_json(dir.path(), &[]);

    assert_eq!(code, Some(1));
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["problematic"], 2);
    assert_eq!(report["summary"]["passed"], 1);

    let analyses = report["analyses"].as_array().unwrap();
    assert!(analyses[0]["path"].as_str().unwrap().ends_with("a_clean.png"));
    assert_eq!(analyses[0]["is_problematic"], false);
    assert_eq!(analyses[1]["is_problematic"], true);
}

#[test]
fn test_batch_all_clean_exits_zero() {
    let dir = create_test_images(vec![
        ("one.png", SyntheticImageBuilder::noise(400, 300, 1)),
        ("two.png", SyntheticImageBuilder::noise(300, 400, 2)),
    ]);

    let (code, report) = batch_json(dir.path(), &[]);

    assert_eq!(code, Some(0));
    assert_eq!(report["summary"]["passed"], 2);
}

#[test]
fn test_batch_corrupt_file_is_recorded() {
    let dir = create_test_images(vec![("good.png", SyntheticImageBuilder::noise(400, 300, 1))]);
    std::fs::write(dir.path().join("broken.jpg"), b"not really a jpeg").unwrap();

    let (code, report) = batch_json(dir.path(), &[]);

    assert_eq!(code, Some(1));
    assert_eq!(report["summary"]["total"], 2);
    let broken = &report["analyses"][0];
    assert!(broken["path"].as_str().unwrap().ends_with("broken.jpg"));
    assert_eq!(broken["results"][0]["detector_name"], "image_loader");
    assert_eq!(
        broken["results"][0]["details"]["error_type"],
        "image_load_error"
    );
}

#[test]
fn test_batch_recursive_flag() {
    let dir = create_test_images(vec![("top.png", SyntheticImageBuilder::noise(400, 300, 1))]);
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    SyntheticImageBuilder::flat_gray()
        .image
        .save(nested.join("deep.png"))
        .unwrap();

    let (flat_code, flat) = batch_json(dir.path(), &[]);
    let (deep_code, deep) = batch_json(dir.path(), &["--recursive"]);

    assert_eq!(flat_code, Some(0));
    assert_eq!(flat["summary"]["total"], 1);
    assert_eq!(deep_code, Some(1));
    assert_eq!(deep["summary"]["total"], 2);
}

#[test]
fn test_custom_mode_from_environment() {
    let dir = create_test_images(vec![("flat.png", SyntheticImageBuilder::flat_gray())]);

    let (code, report) = batch_json(
        dir.path(),
        &["--mode", "custom"],
    );
    assert_eq!(code, Some(1), "flat image fails with every detector on");
    assert_eq!(report["summary"]["problematic"], 1);

    let output = pixelguard()
        .arg("batch")
        .arg(dir.path())
        .args(["--mode", "custom", "--format", "json", "-q"])
        .env("PXG_DETECTOR_BORDER_FILL_ENABLED", "false")
        .env("PXG_DETECTOR_UNIFORM_COLOR_ENABLED", "false")
        .env("PXG_DETECTOR_BACKGROUND_ENABLED", "false")
        .output()
        .unwrap();
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(output.status.code(), Some(0));
    let results = report["analyses"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["detector_name"], "ratio");
}
