//! Uniform-color detection: a single color covering most of the image
//! interior, e.g. blank or placeholder images.

use image::{DynamicImage, RgbImage};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde_json::json;

use super::{percent, run_guarded};
use crate::config::UniformColorConfig;
use crate::domain::{into_details, DetectionError, DetectionResult, Detector};
use crate::sampling::{chebyshev_coverage, convert_all, interior, mean_color, KMeans};

const ERROR_KIND: &str = "uniform_color_detection_error";

/// Flags images where one color covers at least the configured share of
/// sampled pixels.
#[derive(Debug, Clone, Default)]
pub struct UniformColorDetector {
    config: UniformColorConfig,
}

impl UniformColorDetector {
    /// Detector identifier.
    pub const NAME: &'static str = "uniform_color";

    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: UniformColorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &UniformColorConfig {
        &self.config
    }

    fn analyze(&self, image: &RgbImage) -> Result<DetectionResult, DetectionError> {
        let samples = self.sample_pixels(image)?;
        let converted = convert_all(&samples, self.config.color_space);
        let dominant = dominant_color(&converted);
        let coverage = if dominant.iter().all(|c| c.is_finite()) {
            let valid: Vec<[f64; 3]> = converted
                .into_iter()
                .filter(|p| p.iter().all(|c| c.is_finite()))
                .collect();
            chebyshev_coverage(&valid, dominant, f64::from(self.config.color_delta_threshold))
        } else {
            0.0
        };

        let is_problematic = coverage >= self.config.coverage_threshold;
        let mut issues = Vec::new();
        if is_problematic {
            issues.push(format!(
                "Image is {} uniform color (threshold: {})",
                percent(coverage),
                percent(self.config.coverage_threshold)
            ));
        }

        let details = into_details(json!({
            "uniformity_percentage": coverage,
            "most_common_color": dominant,
            "color_space": self.config.color_space,
            "sample_count": samples.len(),
            "total_pixel_count": u64::from(image.width()) * u64::from(image.height()),
            "color_tolerance": self.config.color_delta_threshold,
            "threshold": self.config.coverage_threshold,
        }));
        Ok(DetectionResult::new(
            Self::NAME,
            is_problematic,
            coverage,
            details,
            issues,
        ))
    }

    /// Pixels of the analysis region, subsampled without replacement down to
    /// `sample_size` when larger.
    fn sample_pixels(&self, image: &RgbImage) -> Result<Vec<[u8; 3]>, DetectionError> {
        let pixels = if self.config.ignore_edges {
            let fraction = self.config.edge_ignore_fraction;
            if !(0.0..=0.5).contains(&fraction) {
                return Err(DetectionError::Detector {
                    kind: ERROR_KIND,
                    message: format!(
                        "edge ignore fraction must be within [0, 0.5], got {fraction}"
                    ),
                });
            }
            interior(image, fraction)
        } else {
            image.pixels().map(|p| p.0).collect()
        };

        if pixels.len() <= self.config.sample_size {
            return Ok(pixels);
        }
        let mut rng = match self.config.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(index::sample(&mut rng, pixels.len(), self.config.sample_size)
            .into_iter()
            .map(|i| pixels[i])
            .collect())
    }
}

/// Single-cluster centroid of the finite samples. Empty input gives zero and
/// a single sample is its own mean.
fn dominant_color(samples: &[[f64; 3]]) -> [f64; 3] {
    let finite: Vec<[f64; 3]> = samples
        .iter()
        .copied()
        .filter(|p| p.iter().all(|c| c.is_finite()))
        .collect();
    match finite.len() {
        0 => [0.0; 3],
        1 => finite[0],
        _ => KMeans::new(1)
            .fit(&finite)
            .map(|fit| fit.centers[0])
            .or_else(|_| mean_color(&finite).ok_or(()))
            .unwrap_or([0.0; 3]),
    }
}

impl Detector for UniformColorDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn detect(&self, image: &DynamicImage) -> DetectionResult {
        run_guarded(Self::NAME, image, |rgb| self.analyze(rgb))
    }
}
