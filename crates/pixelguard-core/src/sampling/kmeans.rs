//! Seeded, weighted k-means over 3-channel colors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::ClusterError;

type Point = [f64; 3];

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster centers.
    pub centers: Vec<Point>,
    /// Total weight assigned to each center.
    pub counts: Vec<usize>,
    /// Weighted sum of squared distances to the assigned centers.
    pub inertia: f64,
}

impl KMeansFit {
    /// Center with the largest count and that count. Ties go to the lowest index.
    #[must_use]
    pub fn dominant(&self) -> Option<(Point, usize)> {
        let mut best: Option<(Point, usize)> = None;
        for (&center, &count) in self.centers.iter().zip(&self.counts) {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((center, count));
            }
        }
        best
    }
}

/// Lloyd's algorithm with k-means++ initialization and several restarts.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    clusters: usize,
    restarts: usize,
    max_iterations: usize,
    tolerance: f64,
}

impl KMeans {
    /// Seed for the k-means++ initialization, shared by every detector.
    pub const DEFAULT_SEED: u64 = 42;

    /// A fit with `clusters` centers, 10 restarts and at most 300 iterations.
    #[must_use]
    pub const fn new(clusters: usize) -> Self {
        Self {
            clusters,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    /// Clusters unweighted points. Non-finite points are ignored.
    ///
    /// # Errors
    ///
    /// [`ClusterError::InvalidClusterCount`] when zero clusters were requested,
    /// [`ClusterError::Empty`] when no finite point remains.
    pub fn fit(&self, points: &[Point]) -> Result<KMeansFit, ClusterError> {
        let weighted: Vec<(Point, usize)> = points.iter().map(|&p| (p, 1)).collect();
        self.fit_weighted(&weighted)
    }

    /// Clusters points with integer weights, e.g. histogram counts.
    ///
    /// The cluster count is capped at the number of distinct input points.
    ///
    /// # Errors
    ///
    /// Same as [`KMeans::fit`].
    pub fn fit_weighted(&self, points: &[(Point, usize)]) -> Result<KMeansFit, ClusterError> {
        if self.clusters == 0 {
            return Err(ClusterError::InvalidClusterCount);
        }
        let points: Vec<(Point, usize)> = points
            .iter()
            .copied()
            .filter(|(p, w)| *w > 0 && p.iter().all(|c| c.is_finite()))
            .collect();
        if points.is_empty() {
            return Err(ClusterError::Empty);
        }

        let k = self.clusters.min(points.len());
        let threshold = self.tolerance * mean_variance(&points);
        let mut rng = StdRng::seed_from_u64(Self::DEFAULT_SEED);

        let mut best: Option<KMeansFit> = None;
        for _ in 0..self.restarts {
            let centers = init_plus_plus(&points, k, &mut rng);
            let fit = self.lloyd(&points, centers, threshold);
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.ok_or(ClusterError::Empty)
    }

    fn lloyd(
        &self,
        points: &[(Point, usize)],
        mut centers: Vec<Point>,
        threshold: f64,
    ) -> KMeansFit {
        let k = centers.len();
        for _ in 0..self.max_iterations {
            let mut sums = vec![[0.0; 3]; k];
            let mut weights = vec![0usize; k];
            for &(p, w) in points {
                let (idx, _) = nearest(&centers, p);
                weights[idx] += w;
                for (s, c) in sums[idx].iter_mut().zip(p) {
                    *s += c * weight(w);
                }
            }

            let mut shift = 0.0;
            for ((center, sum), &w) in centers.iter_mut().zip(&sums).zip(&weights) {
                if w == 0 {
                    continue;
                }
                let updated = sum.map(|s| s / weight(w));
                shift += squared_distance(*center, updated);
                *center = updated;
            }
            if shift <= threshold {
                break;
            }
        }

        let mut counts = vec![0usize; k];
        let mut inertia = 0.0;
        for &(p, w) in points {
            let (idx, dist) = nearest(&centers, p);
            counts[idx] += w;
            inertia += dist * weight(w);
        }
        KMeansFit {
            centers,
            counts,
            inertia,
        }
    }
}

/// Mean of the finite points, `None` if there are none.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_color(points: &[Point]) -> Option<Point> {
    let finite: Vec<&Point> = points
        .iter()
        .filter(|p| p.iter().all(|c| c.is_finite()))
        .collect();
    if finite.is_empty() {
        return None;
    }
    let mut sum = [0.0; 3];
    for p in &finite {
        for (s, c) in sum.iter_mut().zip(p.iter()) {
            *s += c;
        }
    }
    let n = finite.len() as f64;
    Some(sum.map(|s| s / n))
}

/// k-means++: the first center is drawn by weight, later ones by weight times
/// squared distance to the closest chosen center.
fn init_plus_plus(points: &[(Point, usize)], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centers = Vec::with_capacity(k);
    let weights: Vec<f64> = points.iter().map(|&(_, w)| weight(w)).collect();
    centers.push(points[draw(&weights, rng)].0);

    while centers.len() < k {
        let scores: Vec<f64> = points
            .iter()
            .map(|&(p, w)| nearest(&centers, p).1 * weight(w))
            .collect();
        if scores.iter().sum::<f64>() <= 0.0 {
            // Every remaining point coincides with a center.
            centers.push(centers[0]);
            continue;
        }
        centers.push(points[draw(&scores, rng)].0);
    }
    centers
}

/// Index drawn with probability proportional to `scores`.
fn draw(scores: &[f64], rng: &mut StdRng) -> usize {
    let total: f64 = scores.iter().sum();
    let mut target = rng.random::<f64>() * total;
    for (i, &score) in scores.iter().enumerate() {
        if target < score {
            return i;
        }
        target -= score;
    }
    scores.iter().rposition(|&s| s > 0.0).unwrap_or(0)
}

fn nearest(centers: &[Point], p: Point) -> (usize, f64) {
    centers
        .iter()
        .enumerate()
        .map(|(i, &c)| (i, squared_distance(c, p)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn squared_distance(a: Point, b: Point) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

#[allow(clippy::cast_precision_loss)]
fn weight(w: usize) -> f64 {
    w as f64
}

/// Weighted mean of the per-dimension variances.
fn mean_variance(points: &[(Point, usize)]) -> f64 {
    let total: f64 = points.iter().map(|&(_, w)| weight(w)).sum();
    let mut mean = [0.0; 3];
    for &(p, w) in points {
        for (m, c) in mean.iter_mut().zip(p) {
            *m += c * weight(w) / total;
        }
    }
    let mut variance = 0.0;
    for &(p, w) in points {
        variance += squared_distance(p, mean) * weight(w) / total;
    }
    variance / 3.0
}
