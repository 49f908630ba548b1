//! Binarization of raw label values.
//!
//! Observation files store labels as real numbers. Every routine that needs
//! a class decision goes through a single [`LabelPolicy`] so the threshold
//! search, the confusion matrix and the plots always agree on which
//! observations are positive.

/// Rule deciding whether a raw label counts as the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// Positive when `label > 0.5`.
    #[default]
    AboveHalf,
    /// Positive when `label != 0.0`.
    NonZero,
}

impl LabelPolicy {
    /// Whether `label` is positive under this policy.
    #[inline]
    pub fn is_positive(self, label: f64) -> bool {
        match self {
            LabelPolicy::AboveHalf => label > 0.5,
            LabelPolicy::NonZero => label != 0.0,
        }
    }

    /// Binarize a slice of raw labels.
    pub fn binarize(self, labels: &[f64]) -> Vec<bool> {
        labels.iter().map(|&l| self.is_positive(l)).collect()
    }
}
