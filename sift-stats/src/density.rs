//! Gaussian kernel density estimation for class-conditional score
//! distributions.

use sift_core::{Result, SiftError};

use crate::dataset::Dataset;
use crate::label::LabelPolicy;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Gaussian KDE with Scott's rule bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit a KDE to `samples`.
    ///
    /// Bandwidth is `σ · n^(-1/5)` with `σ` the sample standard deviation.
    ///
    /// # Errors
    ///
    /// Requires at least 2 samples with non-zero spread.
    pub fn new(samples: &[f64]) -> Result<Self> {
        let n = samples.len();
        if n < 2 {
            return Err(SiftError::InvalidInput(format!(
                "kde: need at least 2 samples, got {n}"
            )));
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = var.sqrt();
        if std == 0.0 || !std.is_finite() {
            return Err(SiftError::InvalidInput(
                "kde: samples have zero variance".into(),
            ));
        }
        Ok(Self {
            samples: samples.to_vec(),
            bandwidth: std * (n as f64).powf(-0.2),
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Density at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let u = (x - s) / h;
                (-0.5 * u * u).exp()
            })
            .sum();
        sum * INV_SQRT_2PI / (h * self.samples.len() as f64)
    }

    /// Range covering the samples extended by `cut` bandwidths on each side.
    pub fn support(&self, cut: f64) -> (f64, f64) {
        let lo = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lo - cut * self.bandwidth, hi + cut * self.bandwidth)
    }

    /// Evaluate on `points` evenly spaced values over `[lo, hi]`.
    pub fn grid(&self, lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
        match points {
            0 => Vec::new(),
            1 => vec![(lo, self.evaluate(lo))],
            _ => {
                let step = (hi - lo) / (points - 1) as f64;
                (0..points)
                    .map(|i| {
                        let x = lo + step * i as f64;
                        (x, self.evaluate(x))
                    })
                    .collect()
            }
        }
    }
}

/// Score densities of the negative and positive classes.
#[derive(Debug, Clone)]
pub struct ClassDensities {
    pub negative: GaussianKde,
    pub positive: GaussianKde,
}

impl ClassDensities {
    /// Fit one KDE per class.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::DegenerateLabels`] if either class cannot be
    /// estimated (fewer than 2 samples or a single repeated score).
    pub fn estimate(data: &Dataset, policy: LabelPolicy) -> Result<Self> {
        let (neg, pos) = data.class_scores(policy);
        let fit = |name: &str, scores: &[f64]| {
            GaussianKde::new(scores).map_err(|e| {
                SiftError::DegenerateLabels(format!("{name} class: {e}"))
            })
        };
        Ok(Self {
            negative: fit("negative", &neg)?,
            positive: fit("positive", &pos)?,
        })
    }

    /// Joint support of both classes, `cut` bandwidths beyond the data.
    pub fn support(&self, cut: f64) -> (f64, f64) {
        let (a_lo, a_hi) = self.negative.support(cut);
        let (b_lo, b_hi) = self.positive.support(cut);
        (a_lo.min(b_lo), a_hi.max(b_hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scott_bandwidth() {
        // std (ddof=1) of [0, 2] is sqrt(2)
        let kde = GaussianKde::new(&[0.0, 2.0]).unwrap();
        let expected = 2.0f64.sqrt() * 2.0f64.powf(-0.2);
        assert!((kde.bandwidth() - expected).abs() < 1e-12);
    }

    #[test]
    fn density_integrates_to_one() {
        let kde = GaussianKde::new(&[0.1, 0.4, 0.45, 0.9, 1.3]).unwrap();
        let (lo, hi) = kde.support(6.0);
        let grid = kde.grid(lo, hi, 4001);
        let step = grid[1].0 - grid[0].0;
        let area: f64 = grid.iter().map(|&(_, y)| y).sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3);
    }

    #[test]
    fn symmetric_about_single_pair() {
        let kde = GaussianKde::new(&[-1.0, 1.0]).unwrap();
        assert!((kde.evaluate(0.5) - kde.evaluate(-0.5)).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_samples() {
        assert!(GaussianKde::new(&[1.0]).is_err());
        assert!(GaussianKde::new(&[0.3, 0.3, 0.3]).is_err());
    }

    #[test]
    fn grid_edges() {
        let kde = GaussianKde::new(&[0.0, 1.0]).unwrap();
        assert!(kde.grid(0.0, 1.0, 0).is_empty());
        let g = kde.grid(0.0, 1.0, 3);
        assert_eq!(g.len(), 3);
        assert!((g[1].0 - 0.5).abs() < 1e-12);
        assert!((g[2].0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn class_densities_need_both_classes() {
        let ds = Dataset::new(vec![0.0, 0.0, 0.0], vec![0.1, 0.2, 0.3]).unwrap();
        assert!(matches!(
            ClassDensities::estimate(&ds, LabelPolicy::AboveHalf),
            Err(SiftError::DegenerateLabels(_))
        ));
    }

    #[test]
    fn class_densities_support_spans_both() {
        let ds = Dataset::new(
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.1, 0.3, 0.7, 0.9],
        )
        .unwrap();
        let d = ClassDensities::estimate(&ds, LabelPolicy::AboveHalf).unwrap();
        let (lo, hi) = d.support(0.0);
        assert!((lo - 0.1).abs() < 1e-12);
        assert!((hi - 0.9).abs() < 1e-12);
    }
}
