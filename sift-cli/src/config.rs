//! Run configuration: built-in defaults, optionally overlaid by a TOML file,
//! then by command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sift_core::SiftError;
use sift_plot::OutputFormat;

use crate::cli::{Args, LabelPolicyChoice, ReportKind, ScanOrderChoice};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub reports: Vec<ReportKind>,
    pub threshold: Option<f64>,
    pub label_policy: LabelPolicyChoice,
    pub scan_order: ScanOrderChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("o.txt"),
            output: PathBuf::from("plot.svg"),
            reports: vec![ReportKind::Threshold, ReportKind::Confusion],
            threshold: None,
            label_policy: LabelPolicyChoice::default(),
            scan_order: ScanOrderChoice::default(),
        }
    }
}

impl Config {
    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).map_err(|e| {
            anyhow::Error::from(SiftError::Config(format!("{}: {}", path.display(), e)))
        })
    }

    /// Defaults, then the `--config` file if given, then explicit flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(args);
        if let Some(t) = config.threshold {
            anyhow::ensure!(!t.is_nan(), "threshold must be a number");
        }
        if config.reports.iter().any(|r| *r != ReportKind::Threshold) {
            OutputFormat::from_path(&config.output)
                .with_context(|| format!("output {}", config.output.display()))?;
        }
        Ok(config)
    }

    fn apply(&mut self, args: &Args) {
        if let Some(input) = &args.input {
            self.input = input.clone();
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        if !args.reports.is_empty() {
            self.reports = args.reports.clone();
        }
        if args.threshold.is_some() {
            self.threshold = args.threshold;
        }
        if let Some(policy) = args.label_policy {
            self.label_policy = policy;
        }
        if let Some(order) = args.scan_order {
            self.scan_order = order;
        }
    }
}
