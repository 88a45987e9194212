//! Engine scenarios driven through the public API with synthetic images.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::missing_panics_doc)]

use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};
use pixelguard_core::config::{AspectRatio, BackgroundMethod, DetectionMode, EnvSnapshot};
use pixelguard_core::detectors::{
    BackgroundDetector, BorderFillDetector, CompositeDetector, RatioDetector, UniformColorDetector,
};
use pixelguard_core::{
    BackgroundConfig, BatchAnalyzer, DetectionConfig, Detector, DetectorKind, ImageAnalyzer,
    PixelGuard, RatioConfig, ResultOutput,
};
use pixelguard_test_support::{
    MockImageSource, MockProgressSink, MockResultOutput, PanickingDetector, StaticDetector,
    SyntheticImageBuilder,
};

fn ratio_config(targets: &[(f64, f64)]) -> RatioConfig {
    RatioConfig {
        target_ratios: targets
            .iter()
            .map(|&(w, h)| AspectRatio::new(w, h).unwrap())
            .collect(),
        tolerance: 0.1,
        ..RatioConfig::default()
    }
}

// === Detectors ===

#[test]
fn test_ratio_full_hd_matches() {
    let detector = RatioDetector::new(ratio_config(&[(16.0, 9.0), (4.0, 3.0), (1.0, 1.0)]));
    let image = DynamicImage::new_rgb8(1920, 1080);

    let result = detector.detect(&image);

    assert!(!result.is_problematic);
    assert_eq!(result.confidence(), 0.0);
    let actual = result.details["actual_aspect_ratio"].as_f64().unwrap();
    assert!((actual - 1.778).abs() < 1e-3);
}

#[test]
fn test_ratio_two_to_one_mismatch() {
    let detector = RatioDetector::new(ratio_config(&[(16.0, 9.0), (4.0, 3.0), (1.0, 1.0)]));
    let result = detector.detect(&DynamicImage::new_rgb8(1000, 500));

    assert!(result.is_problematic);
    assert!(result
        .issues
        .iter()
        .any(|i| i.contains("doesn't match any target ratios")));
}

#[test]
fn test_border_fill_gray_passes() {
    let image = SyntheticImageBuilder::uniform_gray(100, 100, 128);
    let result = BorderFillDetector::default().detect(&image.image);
    assert!(!result.is_problematic);
    assert!(result.issues.is_empty());
}

#[test]
fn test_border_fill_black_top_rows() {
    let mut rgb = RgbImage::from_pixel(100, 100, Rgb([128, 128, 128]));
    for y in 0..10 {
        for x in 0..100 {
            rgb.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    let result = BorderFillDetector::default().detect(&DynamicImage::ImageRgb8(rgb));

    assert!(result.is_problematic);
    assert!(result
        .issues
        .iter()
        .any(|i| i.contains("Top border has black fill")));
}

#[test]
fn test_uniform_gray_is_flagged() {
    let image = SyntheticImageBuilder::uniform_gray(100, 100, 128);
    let result = UniformColorDetector::default().detect(&image.image);

    assert!(result.is_problematic);
    let coverage = result.details["uniformity_percentage"].as_f64().unwrap();
    assert!((coverage - 1.0).abs() < 1e-9);
}

#[test]
fn test_background_dominates_around_square() {
    let image =
        SyntheticImageBuilder::centered_square(100, 100, 20, [128, 128, 128], [255, 255, 255]);
    let detector = BackgroundDetector::new(BackgroundConfig {
        method: BackgroundMethod::EdgeBased,
        coverage_threshold: 0.65,
        ..BackgroundConfig::default()
    });

    let result = detector.detect(&image.image);

    assert!(result.is_problematic);
    assert_eq!(result.details["dominant_color"], serde_json::json!([128, 128, 128]));
}

#[test]
fn test_empty_image_fails_every_detector() {
    let empty = SyntheticImageBuilder::empty();
    let analysis = ImageAnalyzer::new(DetectionConfig::default()).analyze(&empty);

    assert!(analysis.is_problematic());
    assert_eq!(analysis.results().len(), 4);
    for result in analysis.results() {
        assert_eq!(result.error_type(), Some("invalid_image"));
        assert_eq!(result.confidence(), 1.0);
    }
}

// === Composite ===

#[test]
fn test_composite_without_detectors_passes() {
    let config = DetectionConfig::default().with_enabled_detectors(Vec::new());
    let result = CompositeDetector::from_config(&config).detect(&DynamicImage::new_rgb8(8, 8));

    assert!(!result.is_problematic);
    assert_eq!(result.confidence(), 0.0);
    assert!(result.details.is_empty());
    assert!(result.issues.is_empty());
}

#[test]
fn test_composite_confidence_is_problematic_share() {
    let mut composite = CompositeDetector::default();
    composite.add(Box::new(StaticDetector::flagging("a", "bad a")));
    composite.add(Box::new(StaticDetector::passing("b")));
    composite.add(Box::new(StaticDetector::flagging("c", "bad c")));
    composite.add(Box::new(StaticDetector::passing("d")));

    let result = composite.detect(&DynamicImage::new_rgb8(8, 8));

    assert!(result.is_problematic);
    assert_eq!(result.confidence(), 0.5);
    assert_eq!(result.issues, vec!["bad a", "bad c"]);
    assert_eq!(result.details.len(), 4);
}

#[test]
fn test_panicking_detector_is_contained() {
    let composite = CompositeDetector::new(vec![
        Box::new(PanickingDetector::new("boom")),
        Box::new(StaticDetector::passing("after")),
    ]);
    let analyzer = ImageAnalyzer::with_composite(DetectionConfig::default(), composite);

    let analysis = analyzer.analyze(&SyntheticImageBuilder::clean_photo());

    assert!(analysis.is_problematic());
    assert_eq!(analysis.results()[0].error_type(), Some("detector_error"));
    assert_eq!(analysis.results()[1].detector_name, "after");
}

// === Modes ===

#[test]
fn test_clean_photo_passes_default_mode() {
    let engine = PixelGuard::from_mode(DetectionMode::Default, &EnvSnapshot::default());
    let analysis = engine.analyze(&SyntheticImageBuilder::clean_photo());
    assert!(!analysis.is_problematic(), "{:?}", analysis.failure_summary());
}

#[test]
fn test_custom_mode_reads_snapshot() {
    let env = EnvSnapshot::from_pairs([
        ("PXG_DETECTOR_BORDER_FILL_ENABLED", "false"),
        ("PXG_DETECTOR_UNIFORM_COLOR_ENABLED", "false"),
        ("PXG_DETECTOR_BACKGROUND_ENABLED", "false"),
        ("PXG_RATIO_TARGET_RATIOS", "2:1"),
    ]);
    let engine = PixelGuard::from_mode(DetectionMode::Custom, &env);

    assert_eq!(engine.config().enabled_detectors(), &[DetectorKind::Ratio]);
    let analysis = engine.analyze_image("wide.png", &DynamicImage::new_rgb8(1000, 500));
    assert!(!analysis.is_problematic());
}

// === Batch ===

#[test]
fn test_batch_with_mixed_images() {
    let source = MockImageSource::new(vec![
        SyntheticImageBuilder::clean_photo(),
        SyntheticImageBuilder::black_top_border(320, 180, 18),
        SyntheticImageBuilder::flat_gray(),
    ])
    .with_failure("missing.jpg", "No such file");
    let progress = MockProgressSink::new();

    let report = PixelGuard::default().analyze_batch(&source, &progress);

    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.problematic, 3);
    assert_eq!(report.summary.passed, 1);
    assert!(!report.analyses[0].is_problematic());
    assert!(report.analyses[1].results()[0]
        .issues
        .iter()
        .any(|i| i.starts_with("Top border has black fill")));
    assert_eq!(
        report.analyses[3].results()[0].error_type(),
        Some("image_load_error")
    );

    assert_eq!(progress.started_count(), 3);
    assert_eq!(progress.completed_count(), 4);
    assert_eq!(progress.failed_count(), 1);
    assert_eq!(progress.finished_summary(), Some(report.summary));
}

#[test]
fn test_batch_analyzer_shares_detectors() {
    let shared = Arc::new(ImageAnalyzer::with_composite(
        DetectionConfig::default(),
        CompositeDetector::new(vec![Box::new(StaticDetector::passing("only"))]),
    ));
    let batch = BatchAnalyzer::with_analyzer(Arc::clone(&shared));
    let source = MockImageSource::new(vec![
        SyntheticImageBuilder::single_pixel(0),
        SyntheticImageBuilder::single_pixel(255),
    ]);

    let report = batch.process(&source);

    assert_eq!(report.summary.passed, 2);
    assert_eq!(source.iteration_count(), 1);
    assert_eq!(shared.composite().names(), vec!["only"]);
}

#[test]
fn test_batch_report_reaches_output() {
    let source = MockImageSource::new(vec![
        SyntheticImageBuilder::checkerboard(400, 300, 20),
        SyntheticImageBuilder::flat_gray(),
    ]);
    let output = MockResultOutput::new();

    let report = PixelGuard::default().analyze_batch(&source, &MockProgressSink::new());
    output.report_batch(&report).unwrap();
    output.report_single(&report.analyses[0]).unwrap();
    output.flush().unwrap();

    let batches = output.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].summary.total, 2);
    assert_eq!(batches[0].summary.problematic, 1);
    assert!(batches[0].analyses[1].is_problematic());

    // Alternating black and white cells never form a uniform border, color or background.
    let checkerboard = &output.singles()[0];
    assert!(!checkerboard.is_problematic());
    assert_eq!(checkerboard.results().len(), 4);
    assert_eq!(output.flush_count(), 1);
}
