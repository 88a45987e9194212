//! Background dominance detection: estimate the background color from the
//! image border (or a global clustering) and measure how much of the whole
//! image it covers.

use std::collections::{BTreeMap, HashMap};

use image::{DynamicImage, RgbImage};
use serde_json::{json, Value};

use super::{percent, run_guarded};
use crate::config::{BackgroundConfig, BackgroundMethod};
use crate::domain::{DetectionError, DetectionResult, Detector, Details};
use crate::sampling::{
    chebyshev_coverage, corner_blocks, edge_bands, euclidean_distance, lab8_to_rgb, mean_color,
    rgb_to_lab8, widen, KMeans,
};

const ERROR_KIND: &str = "background_detection_error";

/// Number of clusters fitted by the histogram method.
const HISTOGRAM_CLUSTERS: usize = 3;

/// Distinct colors of an image in 8-bit Lab with their pixel counts.
///
/// Each distinct RGB value is converted once and shared by the histogram
/// clustering and the coverage pass.
struct ColorHistogram {
    colors: Vec<([f64; 3], usize)>,
    total: usize,
}

impl ColorHistogram {
    fn new(image: &RgbImage) -> Self {
        let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
        for pixel in image.pixels() {
            *counts.entry(pixel.0).or_insert(0) += 1;
        }
        let colors = counts
            .into_iter()
            .map(|(rgb, count)| (rgb_to_lab8(rgb), count))
            .collect();
        Self {
            colors,
            total: image.pixels().len(),
        }
    }

    /// Distinct Lab colors weighted by pixel count, in a stable order.
    fn lab_points(&self) -> Vec<([f64; 3], usize)> {
        let mut lab: BTreeMap<[u64; 3], ([f64; 3], usize)> = BTreeMap::new();
        for &(point, count) in &self.colors {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let key = point.map(|c| c as u64);
            lab.entry(key).or_insert((point, 0)).1 += count;
        }
        lab.into_values().collect()
    }

    /// Fraction of pixels within Lab distance `tolerance` of `target`.
    #[allow(clippy::cast_precision_loss)]
    fn lab_coverage(&self, target: [u8; 3], tolerance: f64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let target = rgb_to_lab8(target);
        let matching: usize = self
            .colors
            .iter()
            .filter(|(lab, _)| euclidean_distance(*lab, target) <= tolerance)
            .map(|(_, count)| count)
            .sum();
        matching as f64 / self.total as f64
    }
}

/// Estimated background color plus method-specific details.
struct Estimate {
    color: [u8; 3],
    method: BackgroundMethod,
    extra: Vec<(&'static str, Value)>,
}

/// Flags images dominated by a single background color.
#[derive(Debug, Clone, Default)]
pub struct BackgroundDetector {
    config: BackgroundConfig,
}

impl BackgroundDetector {
    /// Detector identifier.
    pub const NAME: &'static str = "background";

    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: BackgroundConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    fn analyze(&self, image: &RgbImage) -> Result<DetectionResult, DetectionError> {
        let histogram = ColorHistogram::new(image);
        let estimate = match self.config.method {
            BackgroundMethod::EdgeBased => {
                let fraction = check_fraction("edge", self.config.edge_sample_fraction)?;
                self.from_samples(&edge_bands(image, fraction), BackgroundMethod::EdgeBased)
            }
            BackgroundMethod::CornerBased => {
                let fraction = check_fraction("corner", self.config.corner_sample_fraction)?;
                self.from_samples(&corner_blocks(image, fraction), BackgroundMethod::CornerBased)
            }
            BackgroundMethod::HistogramBased => from_histogram(&histogram),
        };

        let coverage =
            histogram.lab_coverage(estimate.color, f64::from(self.config.color_tolerance));
        let is_problematic = coverage > self.config.coverage_threshold;
        let mut issues = Vec::new();
        if is_problematic {
            issues.push(format!("Background dominates {} of image", percent(coverage)));
        }

        let mut details = Details::new();
        details.insert("dominant_color".into(), json!(estimate.color));
        details.insert("coverage_percentage".into(), json!(coverage));
        details.insert("detection_method".into(), json!(estimate.method));
        for (key, value) in estimate.extra {
            details.insert(key.into(), value);
        }

        Ok(DetectionResult::new(
            Self::NAME,
            is_problematic,
            coverage,
            details,
            issues,
        ))
    }

    /// Single-cluster centroid of the border samples, in RGB.
    fn from_samples(&self, samples: &[[u8; 3]], method: BackgroundMethod) -> Estimate {
        let points = widen(samples);
        let center = match KMeans::new(1).fit(&points) {
            Ok(fit) => fit.centers[0],
            Err(e) => {
                tracing::debug!("Falling back to mean color: {e}");
                mean_color(&points).unwrap_or([0.0; 3])
            }
        };
        let color = center.map(truncate_channel);
        let sample_coverage = chebyshev_coverage(
            &points,
            color.map(f64::from),
            f64::from(self.config.color_tolerance),
        );
        Estimate {
            color,
            method,
            extra: vec![
                ("sample_coverage", json!(sample_coverage)),
                ("sample_count", json!(samples.len())),
            ],
        }
    }
}

/// Largest of up to three Lab clusters over the whole image.
#[allow(clippy::cast_precision_loss)]
fn from_histogram(histogram: &ColorHistogram) -> Estimate {
    let points = histogram.lab_points();
    let (center, share) = match KMeans::new(HISTOGRAM_CLUSTERS)
        .fit_weighted(&points)
        .ok()
        .and_then(|fit| fit.dominant())
    {
        Some((center, count)) => (center, count as f64 / histogram.total.max(1) as f64),
        None => (weighted_mean(&points), 1.0),
    };
    Estimate {
        color: lab8_to_rgb(center.map(f64::trunc)),
        method: BackgroundMethod::HistogramBased,
        extra: vec![("histogram_coverage", json!(share))],
    }
}

#[allow(clippy::cast_precision_loss)]
fn weighted_mean(points: &[([f64; 3], usize)]) -> [f64; 3] {
    let total: usize = points.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return [0.0; 3];
    }
    let mut sum = [0.0; 3];
    for (p, w) in points {
        for (s, c) in sum.iter_mut().zip(p) {
            *s += c * *w as f64;
        }
    }
    sum.map(|s| s / total as f64)
}

fn check_fraction(name: &str, fraction: f64) -> Result<f64, DetectionError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(DetectionError::Detector {
            kind: ERROR_KIND,
            message: format!("{name} sample fraction must be within [0, 1], got {fraction}"),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_channel(value: f64) -> u8 {
    if value.is_finite() {
        value.clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

impl Detector for BackgroundDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn detect(&self, image: &DynamicImage) -> DetectionResult {
        run_guarded(Self::NAME, image, |rgb| self.analyze(rgb))
    }
}
