//! Report pipeline: one dataset, several independent reports.

use std::io::Write;

use anyhow::{Context, Result};
use sift_core::Summarizable;
use sift_plot::{render, ConfusionChart, DistributionChart, PrecisionRecallChart};
use sift_stats::metrics::{pr_curve, ConfusionMatrix};
use sift_stats::threshold::RunningSums;
use sift_stats::{select_threshold, Dataset, LabelPolicy, Polarity, ScanOrder, ThresholdSelection};

use crate::cli::ReportKind;
use crate::config::Config;
use crate::format;

/// Shared state of one run: the dataset is read once and every report
/// borrows it.
pub struct Session<'a, W: Write> {
    data: Dataset,
    config: &'a Config,
    policy: LabelPolicy,
    order: ScanOrder,
    selection: Option<ThresholdSelection>,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(data: Dataset, config: &'a Config, out: W) -> Self {
        Self {
            data,
            config,
            policy: config.label_policy.into(),
            order: config.scan_order.into(),
            selection: None,
            out,
        }
    }

    /// Read the configured input file.
    pub fn open(config: &'a Config, out: W) -> Result<Self> {
        let data = sift_io::parse_observations(&config.input)
            .with_context(|| format!("reading observations from {}", config.input.display()))?;
        tracing::info!(input = %config.input.display(), summary = %data.summary(), "loaded dataset");
        Ok(Self::new(data, config, out))
    }

    /// Run every configured report in order.
    pub fn run_all(&mut self) -> Result<()> {
        let charts = self
            .config
            .reports
            .iter()
            .filter(|r| **r != ReportKind::Threshold)
            .count();
        if charts > 1 {
            tracing::warn!(
                output = %self.config.output.display(),
                charts,
                "several chart reports share one output path; only the last is kept"
            );
        }
        let config = self.config;
        for &kind in &config.reports {
            self.run(kind)?;
        }
        Ok(())
    }

    pub fn run(&mut self, kind: ReportKind) -> Result<()> {
        tracing::debug!(?kind, "running report");
        match kind {
            ReportKind::Threshold => self.threshold_search().map(|_| ()),
            ReportKind::Confusion => self.confusion(),
            ReportKind::Distribution => self.distribution(),
            ReportKind::PrecisionRecall => self.precision_recall(),
        }
    }

    /// Select the error-minimizing threshold and print it.
    pub fn threshold_search(&mut self) -> Result<ThresholdSelection> {
        let labels = self.data.binary_labels(self.policy);
        let sel = select_threshold(&labels, self.data.scores(), self.order)?;

        if tracing::enabled!(tracing::Level::TRACE) {
            let sums = RunningSums::compute(&labels, self.data.scores())?;
            let curves = sums.error_curves();
            tracing::trace!(
                negatives = ?sums.negatives,
                positives = ?sums.positives,
                low_negative = ?curves.low_negative,
                low_positive = ?curves.low_positive,
                "running sums"
            );
        }

        writeln!(
            self.out,
            "Minimal error: {} at index {} with threshold {}. Classifier polarity is {}.",
            format::significant(sel.min_error as f64, 2),
            sel.index,
            format::significant(sel.threshold, 2),
            sel.polarity.sign()
        )?;
        tracing::info!(selection = %sel.summary(), "threshold selected");
        self.selection = Some(sel);
        Ok(sel)
    }

    /// Threshold and polarity for the confusion matrix: a configured
    /// threshold predicts `score >= t`; otherwise the selected split is used.
    fn decision_rule(&mut self) -> Result<(f64, Polarity)> {
        if let Some(t) = self.config.threshold {
            return Ok((t, Polarity::LowNegative));
        }
        let sel = match self.selection {
            Some(sel) => sel,
            None => {
                let labels = self.data.binary_labels(self.policy);
                select_threshold(&labels, self.data.scores(), self.order)?
            }
        };
        Ok((sel.decision_threshold(), sel.polarity))
    }

    /// Confusion matrix at the decision threshold: renders the heatmap, then
    /// prints precision and recall.
    pub fn confusion(&mut self) -> Result<()> {
        let (threshold, polarity) = self.decision_rule()?;
        let labels = self.data.binary_labels(self.policy);
        let cm = ConfusionMatrix::at_threshold(&labels, self.data.scores(), threshold, polarity)?;
        tracing::info!(
            threshold,
            polarity = polarity.sign(),
            matrix = %cm.summary(),
            accuracy = cm.accuracy(),
            f1 = ?cm.f1(),
            "confusion matrix"
        );

        if let Err(e) = cm.try_precision().and_then(|_| cm.try_recall()) {
            tracing::warn!(error = %e, "metric undefined at this threshold");
        }
        render(&self.config.output, &ConfusionChart::new(&cm, threshold))?;

        writeln!(
            self.out,
            "Precision {}, recall {}.",
            format::metric(cm.precision(), 3),
            format::metric(cm.recall(), 3)
        )?;
        Ok(())
    }

    pub fn distribution(&mut self) -> Result<()> {
        let chart = DistributionChart::new(&self.data, self.policy)?;
        render(&self.config.output, &chart)?;
        Ok(())
    }

    pub fn precision_recall(&mut self) -> Result<()> {
        let labels = self.data.binary_labels(self.policy);
        let curve = pr_curve(self.data.scores(), &labels)?;
        tracing::info!(
            average_precision = curve.average_precision,
            points = curve.points.len(),
            "precision-recall curve"
        );
        render(&self.config.output, &PrecisionRecallChart::new(&curve))?;
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_in(dir: &Path, input: &str, reports: Vec<ReportKind>) -> Config {
        let path = dir.join("o.txt");
        std::fs::write(&path, input).unwrap();
        Config {
            input: path,
            output: dir.join("plot.svg"),
            reports,
            ..Config::default()
        }
    }

    fn run(config: &Config) -> Result<String> {
        let mut session = Session::open(config, Vec::new())?;
        session.run_all()?;
        Ok(String::from_utf8(session.into_output()).unwrap())
    }

    #[test]
    fn default_pipeline_on_separable_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            reports: Config::default().reports,
            ..config_in(dir.path(), "0 0.1\n0 0.2\n1 0.8\n1 0.9\n", vec![])
        };
        let out = run(&config).unwrap();
        assert_eq!(
            out,
            "Minimal error: 0.0 at index 1 with threshold 0.2. Classifier polarity is -1.\n\
             Precision 1.0, recall 1.0.\n"
        );
        let svg = std::fs::read_to_string(dir.path().join("plot.svg")).unwrap();
        assert!(svg.contains("Confusion matrix"));
    }

    #[test]
    fn fixed_threshold_skips_search() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            threshold: Some(0.15),
            ..config_in(
                dir.path(),
                "0 0.1\n0 0.2\n1 0.8\n1 0.9\n",
                vec![ReportKind::Confusion],
            )
        };
        let out = run(&config).unwrap();
        // 0.2 is a false positive at 0.15
        assert_eq!(out, "Precision 0.667, recall 1.0.\n");
    }

    #[test]
    fn undefined_precision_prints_nan() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            threshold: Some(5.0),
            ..config_in(dir.path(), "0 0.1\n1 0.9\n", vec![ReportKind::Confusion])
        };
        let out = run(&config).unwrap();
        assert_eq!(out, "Precision nan, recall 0.0.\n");
    }

    #[test]
    fn inverted_data_reports_positive_polarity() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "1 0.1\n1 0.2\n0 0.8\n0 0.9\n",
            vec![ReportKind::Threshold, ReportKind::Confusion],
        );
        let out = run(&config).unwrap();
        assert_eq!(
            out,
            "Minimal error: 0.0 at index 1 with threshold 0.2. Classifier polarity is 1.\n\
             Precision 1.0, recall 1.0.\n"
        );
    }

    #[test]
    fn malformed_input_aborts_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "0 0.1\n1\n", vec![ReportKind::Confusion]);
        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!(!dir.path().join("plot.svg").exists());
    }

    #[test]
    fn empty_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "", vec![ReportKind::Threshold]);
        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("empty input"));
    }

    #[test]
    fn chart_reports_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "0 0.1\n0 0.3\n0 0.35\n1 0.6\n1 0.7\n1 0.95\n",
            vec![ReportKind::PrecisionRecall],
        );
        run(&config).unwrap();
        let svg = std::fs::read_to_string(dir.path().join("plot.svg")).unwrap();
        assert!(svg.contains("AP=1.00"));

        let config = Config {
            reports: vec![ReportKind::Distribution],
            ..config
        };
        run(&config).unwrap();
        let svg = std::fs::read_to_string(dir.path().join("plot.svg")).unwrap();
        assert!(svg.contains("Value probability"));
    }

    #[test]
    fn distribution_needs_both_classes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "0 0.1\n0 0.2\n0 0.3\n",
            vec![ReportKind::Distribution],
        );
        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("degenerate label set"));
    }

    #[test]
    fn failed_confusion_render_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output: dir.path().join("plot.jpg"),
            ..config_in(dir.path(), "0 0.1\n1 0.9\n", vec![ReportKind::Confusion])
        };
        let mut session = Session::open(&config, Vec::new()).unwrap();
        let err = session.run_all().unwrap_err();
        assert!(format!("{err:#}").contains("unsupported image extension"));
        assert!(session.into_output().is_empty());
    }
}
