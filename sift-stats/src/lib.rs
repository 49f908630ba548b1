//! Statistics over labelled classifier scores.
//!
//! - **Dataset** — [`Dataset`] of index-aligned (label, score) columns
//! - **Label policy** — [`LabelPolicy`], the one rule for binarizing labels
//! - **Threshold selection** — running-sum search for the error-minimizing
//!   split ([`select_threshold`])
//! - **Metrics** — confusion matrix, precision/recall, PR curve, average precision
//! - **Density** — Gaussian KDE for class-conditional score distributions

pub mod dataset;
pub mod density;
pub mod label;
pub mod metrics;
pub mod threshold;

pub use dataset::{Dataset, Observation};
pub use label::LabelPolicy;
pub use threshold::{select_threshold, Polarity, ScanOrder, ThresholdSelection};
