//! Labelled score observations.

use sift_core::{Result, SiftError, Summarizable};

use crate::label::LabelPolicy;

/// One (label, score) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Raw label as read from input; binarized through a [`LabelPolicy`].
    pub label: f64,
    /// Classifier output.
    pub score: f64,
}

/// Immutable set of observations stored as two index-aligned columns.
///
/// Observation `i` is `(labels[i], scores[i])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    labels: Vec<f64>,
    scores: Vec<f64>,
}

impl Dataset {
    /// Build a dataset from parallel label and score columns.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::EmptyInput`] for zero observations and
    /// [`SiftError::InvalidInput`] if the columns differ in length or any
    /// value is NaN.
    pub fn new(labels: Vec<f64>, scores: Vec<f64>) -> Result<Self> {
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
        if let Some(i) = scores.iter().position(|s| s.is_nan()) {
            return Err(SiftError::InvalidInput(format!(
                "score at index {i} is NaN"
            )));
        }
        if let Some(i) = labels.iter().position(|l| l.is_nan()) {
            return Err(SiftError::InvalidInput(format!(
                "label at index {i} is NaN"
            )));
        }
        Ok(Self { labels, scores })
    }

    /// Build a dataset from observation pairs.
    pub fn from_observations(observations: &[Observation]) -> Result<Self> {
        let (labels, scores) = observations.iter().map(|o| (o.label, o.score)).unzip();
        Self::new(labels, scores)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Always false for a constructed dataset; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Observation at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Observation> {
        Some(Observation {
            label: *self.labels.get(index)?,
            score: *self.scores.get(index)?,
        })
    }

    /// Iterate over observations in input order.
    pub fn iter(&self) -> impl Iterator<Item = Observation> + '_ {
        self.labels
            .iter()
            .zip(&self.scores)
            .map(|(&label, &score)| Observation { label, score })
    }

    /// Labels binarized under `policy`.
    pub fn binary_labels(&self, policy: LabelPolicy) -> Vec<bool> {
        policy.binarize(&self.labels)
    }

    /// Count of (negative, positive) observations under `policy`.
    pub fn class_counts(&self, policy: LabelPolicy) -> (usize, usize) {
        let pos = self.labels.iter().filter(|&&l| policy.is_positive(l)).count();
        (self.len() - pos, pos)
    }

    /// Scores split by class: `(negative_scores, positive_scores)`.
    pub fn class_scores(&self, policy: LabelPolicy) -> (Vec<f64>, Vec<f64>) {
        let mut neg = Vec::new();
        let mut pos = Vec::new();
        for obs in self.iter() {
            if policy.is_positive(obs.label) {
                pos.push(obs.score);
            } else {
                neg.push(obs.score);
            }
        }
        (neg, pos)
    }
}

impl Summarizable for Dataset {
    fn summary(&self) -> String {
        let (neg, pos) = self.class_counts(LabelPolicy::default());
        format!("n={}, negatives={}, positives={}", self.len(), neg, pos)
    }
}
