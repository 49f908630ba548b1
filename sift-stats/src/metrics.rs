//! Binary classification evaluation metrics.
//!
//! Provides the 2x2 confusion matrix at a score threshold, precision /
//! recall / accuracy derived from it, the precision-recall curve and
//! average precision.

use sift_core::{Result, SiftError, Summarizable};

use crate::threshold::Polarity;

// ---------------------------------------------------------------------------
// Confusion Matrix
// ---------------------------------------------------------------------------

/// Confusion matrix for a binary classifier.
///
/// Laid out as `[[tn, fp], [fn, tp]]`: rows are actual classes
/// (negative, positive), columns are predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from actual and predicted labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices are empty or have different lengths.
    pub fn from_labels(actual: &[bool], predicted: &[bool]) -> Result<Self> {
        if actual.is_empty() {
            return Err(SiftError::EmptyInput);
        }
        if actual.len() != predicted.len() {
            return Err(SiftError::InvalidInput(format!(
                "actual length {} != predicted length {}",
                actual.len(),
                predicted.len()
            )));
        }

        let mut cm = Self::default();
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a, p) {
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
                (true, true) => cm.tp += 1,
            }
        }
        Ok(cm)
    }

    /// Build a confusion matrix by thresholding `scores`.
    ///
    /// Each score is classified with [`Polarity::predict`].
    pub fn at_threshold(
        actual: &[bool],
        scores: &[f64],
        threshold: f64,
        polarity: Polarity,
    ) -> Result<Self> {
        let predicted: Vec<bool> = scores
            .iter()
            .map(|&s| polarity.predict(s, threshold))
            .collect();
        Self::from_labels(actual, &predicted)
    }

    /// Row-major `[[tn, fp], [fn, tp]]`.
    pub fn as_rows(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// Fraction of correct predictions.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    /// Precision `TP / (TP + FP)`, or `None` when nothing is predicted
    /// positive.
    pub fn precision(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fp)
    }

    /// Recall `TP / (TP + FN)`, or `None` when there are no positives.
    pub fn recall(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// Precision, failing with [`SiftError::UndefinedMetric`] on a zero
    /// denominator.
    pub fn try_precision(&self) -> Result<f64> {
        self.precision()
            .ok_or_else(|| SiftError::UndefinedMetric("precision: no predicted positives".into()))
    }

    /// Recall, failing with [`SiftError::UndefinedMetric`] on a zero
    /// denominator.
    pub fn try_recall(&self) -> Result<f64> {
        self.recall()
            .ok_or_else(|| SiftError::UndefinedMetric("recall: no actual positives".into()))
    }

    /// F1 score, `None` if precision or recall is undefined or both are 0.
    pub fn f1(&self) -> Option<f64> {
        let p = self.precision()?;
        let r = self.recall()?;
        if p + r == 0.0 {
            None
        } else {
            Some(2.0 * p * r / (p + r))
        }
    }
}

impl Summarizable for ConfusionMatrix {
    fn summary(&self) -> String {
        format!(
            "tn={}, fp={}, fn={}, tp={}",
            self.tn, self.fp, self.fn_, self.tp
        )
    }
}

fn ratio(num: usize, denom: usize) -> Option<f64> {
    if denom == 0 {
        None
    } else {
        Some(num as f64 / denom as f64)
    }
}

// ---------------------------------------------------------------------------
// Precision-Recall Curve
// ---------------------------------------------------------------------------

/// A single point on the precision-recall curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrPoint {
    /// Score threshold at which this point is computed.
    pub threshold: f64,
    /// Precision: TP / (TP + FP).
    pub precision: f64,
    /// Recall: TP / (TP + FN).
    pub recall: f64,
}

/// Precision-recall curve and its average precision.
#[derive(Debug, Clone)]
pub struct PrCurve {
    /// Points ordered by descending threshold, starting at the anchor
    /// `(recall 0, precision 1)` with an infinite threshold.
    pub points: Vec<PrPoint>,
    /// Average precision: `Σ (Rₙ - Rₙ₋₁) · Pₙ`.
    pub average_precision: f64,
}

/// Compute the precision-recall curve from predicted scores and binary labels.
///
/// Predictions use `score >= threshold`. Observations are ranked by
/// descending score and each run of equal scores becomes one point, so tied
/// observations always switch to positive together.
///
/// # Errors
///
/// Returns an error if the slices are empty, have different lengths, or
/// contain no positive samples.
pub fn pr_curve(scores: &[f64], labels: &[bool]) -> Result<PrCurve> {
    if scores.is_empty() {
        return Err(SiftError::EmptyInput);
    }
    if scores.len() != labels.len() {
        return Err(SiftError::InvalidInput(format!(
            "scores length {} != labels length {}",
            scores.len(),
            labels.len()
        )));
    }

    let total_pos = labels.iter().filter(|&&l| l).count();
    if total_pos == 0 {
        return Err(SiftError::DegenerateLabels("no positive samples".into()));
    }
    let positives = total_pos as f64;

    let mut ranked: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut points = Vec::with_capacity(ranked.len() + 1);
    let mut recall = 0.0;
    points.push(PrPoint {
        threshold: f64::INFINITY,
        precision: 1.0,
        recall,
    });

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut average_precision = 0.0;
    let mut rest = ranked.as_slice();
    while let Some(&(score, _)) = rest.first() {
        let run = rest.iter().take_while(|(s, _)| *s == score).count();
        let (tied, tail) = rest.split_at(run);
        let hits = tied.iter().filter(|(_, positive)| *positive).count();
        tp += hits;
        fp += run - hits;

        let precision = tp as f64 / (tp + fp) as f64;
        let next_recall = tp as f64 / positives;
        average_precision += (next_recall - recall) * precision;
        recall = next_recall;
        points.push(PrPoint {
            threshold: score,
            precision,
            recall,
        });
        rest = tail;
    }

    Ok(PrCurve {
        points,
        average_precision,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ── Confusion Matrix ────────────────────────────────────────

    #[test]
    fn cm_basic_counts() {
        let actual = [true, true, false, false, true, false];
        let predicted = [true, false, false, true, true, false];
        let cm = ConfusionMatrix::from_labels(&actual, &predicted).unwrap();
        assert_eq!(cm.as_rows(), [[2, 1], [1, 2]]);
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn cm_precision_recall() {
        // TP=2, FP=1, FN=1
        let actual = [true, true, true, false, false];
        let predicted = [true, true, false, true, false];
        let cm = ConfusionMatrix::from_labels(&actual, &predicted).unwrap();
        assert!((cm.precision().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.recall().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.f1().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.accuracy() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn cm_at_threshold_inclusive() {
        let actual = [false, false, true, true];
        let scores = [0.1, 0.2, 0.8, 0.9];
        let cm = ConfusionMatrix::at_threshold(&actual, &scores, 0.2, Polarity::LowNegative)
            .unwrap();
        // 0.2 >= 0.2 is predicted positive
        assert_eq!(cm.as_rows(), [[1, 1], [0, 2]]);

        let cm = ConfusionMatrix::at_threshold(&actual, &scores, 0.8, Polarity::LowNegative)
            .unwrap();
        assert_eq!(cm.as_rows(), [[2, 0], [0, 2]]);
    }

    #[test]
    fn cm_low_positive_polarity() {
        let actual = [true, true, false, false];
        let scores = [0.1, 0.2, 0.8, 0.9];
        let cm = ConfusionMatrix::at_threshold(&actual, &scores, 0.8, Polarity::LowPositive)
            .unwrap();
        assert_eq!(cm.as_rows(), [[2, 0], [0, 2]]);
    }

    #[test]
    fn cm_undefined_precision() {
        let actual = [true, false];
        let predicted = [false, false];
        let cm = ConfusionMatrix::from_labels(&actual, &predicted).unwrap();
        assert_eq!(cm.precision(), None);
        assert!(matches!(
            cm.try_precision(),
            Err(SiftError::UndefinedMetric(_))
        ));
        assert_eq!(cm.recall(), Some(0.0));
        assert_eq!(cm.f1(), None);
    }

    #[test]
    fn cm_undefined_recall_without_positives() {
        let actual = [false, false];
        let predicted = [true, false];
        let cm = ConfusionMatrix::from_labels(&actual, &predicted).unwrap();
        assert_eq!(cm.recall(), None);
        assert!(cm.try_recall().is_err());
        assert_eq!(cm.precision(), Some(0.0));
    }

    #[test]
    fn cm_empty_error() {
        assert!(matches!(
            ConfusionMatrix::from_labels(&[], &[]),
            Err(SiftError::EmptyInput)
        ));
    }

    #[test]
    fn cm_length_mismatch_error() {
        assert!(ConfusionMatrix::from_labels(&[true, false], &[true]).is_err());
    }

    // ── PR Curve ────────────────────────────────────────────────

    #[test]
    fn pr_perfect() {
        let scores = vec![0.9, 0.8, 0.3, 0.1];
        let labels = vec![true, true, false, false];
        let pr = pr_curve(&scores, &labels).unwrap();
        assert_eq!(pr.points.len(), 5);
        assert!((pr.average_precision - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pr_known_curve_points() {
        // Sorted: (0.9,T), (0.7,F), (0.5,T), (0.3,F)
        // At 0.9: P=1.0, R=0.5
        // At 0.7: P=0.5, R=0.5
        // At 0.5: P=2/3, R=1.0
        // At 0.3: P=0.5, R=1.0
        let scores = vec![0.9, 0.7, 0.5, 0.3];
        let labels = vec![true, false, true, false];
        let pr = pr_curve(&scores, &labels).unwrap();
        assert_eq!(pr.points.len(), 5);
        let p1 = &pr.points[1];
        assert!((p1.precision - 1.0).abs() < 1e-12);
        assert!((p1.recall - 0.5).abs() < 1e-12);
        assert!((pr.points[3].precision - 2.0 / 3.0).abs() < 1e-12);
        // AP = 0.5 * 1.0 + 0.5 * 2/3
        assert!((pr.average_precision - (0.5 + 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn pr_tied_scores_collapse() {
        let scores = vec![0.5, 0.5, 0.5];
        let labels = vec![true, false, true];
        let pr = pr_curve(&scores, &labels).unwrap();
        assert_eq!(pr.points.len(), 2);
        assert!((pr.points[1].precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((pr.points[1].recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pr_no_positives_error() {
        let scores = vec![0.5, 0.3];
        let labels = vec![false, false];
        assert!(matches!(
            pr_curve(&scores, &labels),
            Err(SiftError::DegenerateLabels(_))
        ));
    }

    #[test]
    fn pr_empty_error() {
        assert!(matches!(pr_curve(&[], &[]), Err(SiftError::EmptyInput)));
    }

    #[test]
    fn pr_average_precision_with_ties() {
        // 0.9: P=1, R=0.5; 0.5 (T and F together): P=2/3, R=1; 0.1: R unchanged
        let scores = vec![0.5, 0.9, 0.1, 0.5];
        let labels = vec![false, true, false, true];
        let pr = pr_curve(&scores, &labels).unwrap();
        assert_eq!(pr.points.len(), 4);
        assert_eq!(pr.points[2].threshold, 0.5);
        assert!((pr.points[2].precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((pr.average_precision - (0.5 + 1.0 / 3.0)).abs() < 1e-12);
    }
}
