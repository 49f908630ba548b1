//! Running-sum threshold selection.
//!
//! Observations are sorted by ascending score and scanned once. At sorted
//! index `i`, with `S⁻`/`S⁺` the negatives/positives seen so far (inclusive)
//! and `T⁻`/`T⁺` the class totals, two error counts are available:
//!
//! - `S⁺ + (T⁻ - S⁻)` if everything up to `i` is predicted negative
//!   ([`Polarity::LowNegative`]);
//! - `S⁻ + (T⁺ - S⁺)` if everything up to `i` is predicted positive
//!   ([`Polarity::LowPositive`]).
//!
//! The split with the smallest error wins. How the two counts compete at a
//! single index is governed by [`ScanOrder`].

use sift_core::{Result, SiftError, Summarizable};

/// Which side of the threshold is predicted positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Scores at or below the split are negative, scores above are positive.
    LowNegative,
    /// Scores at or below the split are positive, scores above are negative.
    LowPositive,
}

impl Polarity {
    /// Numeric encoding: `-1` for [`LowNegative`](Self::LowNegative), `+1`
    /// for [`LowPositive`](Self::LowPositive).
    pub fn sign(self) -> i8 {
        match self {
            Polarity::LowNegative => -1,
            Polarity::LowPositive => 1,
        }
    }

    /// Predicted class of `score` against a decision threshold.
    ///
    /// `LowNegative` predicts positive for `score >= threshold`;
    /// `LowPositive` predicts positive for `score < threshold`.
    #[inline]
    pub fn predict(self, score: f64, threshold: f64) -> bool {
        match self {
            Polarity::LowNegative => score >= threshold,
            Polarity::LowPositive => score < threshold,
        }
    }
}

/// How the two error counts at one index compete for the running minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Test the low-negative error first; the low-positive error is only
    /// considered when the first one does not improve the minimum. A
    /// smaller low-positive error at the same index is then ignored.
    #[default]
    Sequential,
    /// Take the smaller of the two errors at each index (low-negative on
    /// ties) and compare that against the minimum. Always finds the global
    /// minimum.
    Symmetric,
}

/// Result of a threshold search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSelection {
    /// Score of the observation at [`index`](Self::index) in sorted order.
    pub threshold: f64,
    /// Misclassification count of the selected split.
    pub min_error: usize,
    /// Position of the split in ascending-score order.
    pub index: usize,
    pub polarity: Polarity,
    next_score: Option<f64>,
}

impl ThresholdSelection {
    /// Threshold to use with [`Polarity::predict`].
    ///
    /// This is the score of the first observation after the split, or
    /// `+∞` when the split is the last observation. Predictions made with it
    /// reproduce [`min_error`](Self::min_error) unless equal scores straddle
    /// the split.
    pub fn decision_threshold(&self) -> f64 {
        self.next_score.unwrap_or(f64::INFINITY)
    }
}

impl Summarizable for ThresholdSelection {
    fn summary(&self) -> String {
        format!(
            "threshold={:.4}, error={}, index={}, polarity={}",
            self.threshold,
            self.min_error,
            self.index,
            self.polarity.sign()
        )
    }
}

/// Indices of `scores` in ascending order; equal scores keep input order.
pub fn ascending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

fn check_inputs(labels: &[bool], scores: &[f64]) -> Result<()> {
    if labels.len() != scores.len() {
        return Err(SiftError::InvalidInput(format!(
            "labels length {} != scores length {}",
            labels.len(),
            scores.len()
        )));
    }
    if labels.is_empty() {
        return Err(SiftError::EmptyInput);
    }
    Ok(())
}

/// Find the split minimizing misclassifications.
///
/// `labels[i]` is true for positive observations. Runs in `O(n log n)` for
/// the sort plus one linear scan with constant extra state.
///
/// # Errors
///
/// Returns [`SiftError::EmptyInput`] for empty input and
/// [`SiftError::InvalidInput`] if the slices differ in length.
pub fn select_threshold(
    labels: &[bool],
    scores: &[f64],
    order: ScanOrder,
) -> Result<ThresholdSelection> {
    check_inputs(labels, scores)?;

    let sorted = ascending_order(scores);
    let total_pos = labels.iter().filter(|&&l| l).count();
    let total_neg = labels.len() - total_pos;

    let mut seen_neg = 0usize;
    let mut seen_pos = 0usize;
    // (sorted index, error, polarity)
    let mut best: Option<(usize, usize, Polarity)> = None;

    for (i, &k) in sorted.iter().enumerate() {
        if labels[k] {
            seen_pos += 1;
        } else {
            seen_neg += 1;
        }
        let err_low_neg = seen_pos + (total_neg - seen_neg);
        let err_low_pos = seen_neg + (total_pos - seen_pos);

        let improves = |err: usize| best.map_or(true, |(_, min, _)| err < min);
        let candidate = match order {
            ScanOrder::Sequential => {
                if improves(err_low_neg) {
                    Some((err_low_neg, Polarity::LowNegative))
                } else if improves(err_low_pos) {
                    Some((err_low_pos, Polarity::LowPositive))
                } else {
                    None
                }
            }
            ScanOrder::Symmetric => {
                let (err, polarity) = if err_low_pos < err_low_neg {
                    (err_low_pos, Polarity::LowPositive)
                } else {
                    (err_low_neg, Polarity::LowNegative)
                };
                improves(err).then_some((err, polarity))
            }
        };
        if let Some((err, polarity)) = candidate {
            best = Some((i, err, polarity));
        }
    }

    let (index, min_error, polarity) = best.ok_or(SiftError::EmptyInput)?;
    let selection = ThresholdSelection {
        threshold: scores[sorted[index]],
        min_error,
        index,
        polarity,
        next_score: sorted.get(index + 1).map(|&k| scores[k]),
    };
    tracing::debug!(
        n = labels.len(),
        total_neg,
        total_pos,
        index,
        min_error,
        polarity = polarity.sign(),
        "threshold scan finished"
    );
    Ok(selection)
}

/// Cumulative class counts over the ascending-score order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningSums {
    /// Scores in ascending order.
    pub sorted_scores: Vec<f64>,
    /// `negatives[i]`: negatives among the first `i + 1` sorted observations.
    pub negatives: Vec<usize>,
    /// `positives[i]`: positives among the first `i + 1` sorted observations.
    pub positives: Vec<usize>,
}

impl RunningSums {
    /// Compute running sums for the given observations.
    ///
    /// # Errors
    ///
    /// Same conditions as [`select_threshold`].
    pub fn compute(labels: &[bool], scores: &[f64]) -> Result<Self> {
        check_inputs(labels, scores)?;
        let sorted = ascending_order(scores);

        let mut negatives = Vec::with_capacity(sorted.len());
        let mut positives = Vec::with_capacity(sorted.len());
        let (mut neg, mut pos) = (0usize, 0usize);
        for &k in &sorted {
            if labels[k] {
                pos += 1;
            } else {
                neg += 1;
            }
            negatives.push(neg);
            positives.push(pos);
        }

        Ok(Self {
            sorted_scores: sorted.iter().map(|&k| scores[k]).collect(),
            negatives,
            positives,
        })
    }

    pub fn len(&self) -> usize {
        self.sorted_scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_scores.is_empty()
    }

    pub fn total_negatives(&self) -> usize {
        self.negatives.last().copied().unwrap_or(0)
    }

    pub fn total_positives(&self) -> usize {
        self.positives.last().copied().unwrap_or(0)
    }

    /// Error counts of both polarities at every split.
    pub fn error_curves(&self) -> ErrorCurves {
        let t_neg = self.total_negatives();
        let t_pos = self.total_positives();
        let low_negative = self
            .negatives
            .iter()
            .zip(&self.positives)
            .map(|(&s_neg, &s_pos)| s_pos + (t_neg - s_neg))
            .collect();
        let low_positive = self
            .negatives
            .iter()
            .zip(&self.positives)
            .map(|(&s_neg, &s_pos)| s_neg + (t_pos - s_pos))
            .collect();
        ErrorCurves {
            low_negative,
            low_positive,
        }
    }
}

/// Per-split error counts, index-aligned with [`RunningSums`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorCurves {
    /// `S⁺ + (T⁻ - S⁻)` at each split.
    pub low_negative: Vec<usize>,
    /// `S⁻ + (T⁺ - S⁺)` at each split.
    pub low_positive: Vec<usize>,
}
