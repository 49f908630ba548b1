use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(
    name = "sift",
    version,
    about = "Evaluate binary classifier scores: threshold search, confusion matrix, PR curve"
)]
pub struct Args {
    /// Observation file, one `label score` pair per line.
    #[arg(short, long, env = "SIFT_INPUT")]
    pub input: Option<PathBuf>,
    /// Chart output path (.svg, or .png with the `png` feature).
    #[arg(short, long, env = "SIFT_OUTPUT")]
    pub output: Option<PathBuf>,
    /// Reports to run, in order. Repeatable.
    #[arg(short, long = "report", value_enum)]
    pub reports: Vec<ReportKind>,
    /// Fixed confusion-matrix threshold instead of the selected one.
    #[arg(short, long)]
    pub threshold: Option<f64>,
    #[arg(long, value_enum)]
    pub label_policy: Option<LabelPolicyChoice>,
    #[arg(long, value_enum)]
    pub scan_order: Option<ScanOrderChoice>,
    /// TOML file with defaults for the options above.
    #[arg(short, long, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Running-sum threshold search
    Threshold,
    /// Confusion matrix heatmap with precision and recall
    Confusion,
    /// Class-conditional score densities
    Distribution,
    /// Precision-recall curve
    PrecisionRecall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPolicyChoice {
    /// label > 0.5 is positive
    #[default]
    AboveHalf,
    /// label != 0 is positive
    NonZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanOrderChoice {
    /// Low-negative error first, low-positive only if it does not improve
    #[default]
    Sequential,
    /// Smaller of both errors at each split
    Symmetric,
}

impl From<LabelPolicyChoice> for sift_stats::LabelPolicy {
    fn from(value: LabelPolicyChoice) -> Self {
        match value {
            LabelPolicyChoice::AboveHalf => sift_stats::LabelPolicy::AboveHalf,
            LabelPolicyChoice::NonZero => sift_stats::LabelPolicy::NonZero,
        }
    }
}

impl From<ScanOrderChoice> for sift_stats::ScanOrder {
    fn from(value: ScanOrderChoice) -> Self {
        match value {
            ScanOrderChoice::Sequential => sift_stats::ScanOrder::Sequential,
            ScanOrderChoice::Symmetric => sift_stats::ScanOrder::Symmetric,
        }
    }
}
