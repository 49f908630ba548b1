//! Precision-recall step chart.

use plotters::coord::Shift;
use plotters::prelude::*;
use sift_stats::metrics::{PrCurve, PrPoint};

use crate::{Chart, DrawResult};

const CURVE_COLOR: RGBColor = RGBColor(0, 0, 255);

/// Post-step precision-recall curve with every second threshold annotated.
#[derive(Debug, Clone)]
pub struct PrecisionRecallChart {
    points: Vec<PrPoint>,
    average_precision: f64,
}

impl PrecisionRecallChart {
    pub fn new(curve: &PrCurve) -> Self {
        Self {
            points: curve.points.clone(),
            average_precision: curve.average_precision,
        }
    }

    pub fn title(&self) -> String {
        format!(
            "2-class Precision-Recall curve: AP={:.2}",
            self.average_precision
        )
    }

    /// Vertices of the post-step path: precision holds until the next
    /// recall value is reached.
    fn step_path(&self) -> Vec<(f64, f64)> {
        let mut path = Vec::with_capacity(self.points.len() * 2);
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                path.push((p.recall, self.points[i - 1].precision));
            }
            path.push((p.recall, p.precision));
        }
        path
    }

    /// Points to label with their threshold, skipping the infinite anchor.
    fn annotated(&self) -> impl Iterator<Item = &PrPoint> {
        self.points
            .iter()
            .filter(|p| p.threshold.is_finite())
            .step_by(2)
    }
}

impl Chart for PrecisionRecallChart {
    fn size(&self) -> (u32, u32) {
        (1800, 500)
    }

    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(self.title(), ("sans-serif", 22))
            .x_label_area_size(45)
            .y_label_area_size(45)
            .build_cartesian_2d(0.0..1.0, 0.0..1.05)?;
        chart
            .configure_mesh()
            .x_desc("Recall")
            .y_desc("Precision")
            .draw()?;

        let path = self.step_path();
        chart.draw_series(AreaSeries::new(path.iter().copied(), 0.0, CURVE_COLOR.mix(0.2)))?;
        chart.draw_series(LineSeries::new(path, CURVE_COLOR.mix(0.2)))?;
        chart.draw_series(self.annotated().map(|p| {
            Text::new(
                format!("{:.2}", p.threshold),
                (p.recall, p.precision),
                ("sans-serif", 12),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;
    use sift_stats::metrics::pr_curve;

    fn curve() -> PrCurve {
        pr_curve(&[0.9, 0.7, 0.5, 0.3], &[true, false, true, false]).unwrap()
    }

    #[test]
    fn step_path_holds_precision() {
        let chart = PrecisionRecallChart::new(&curve());
        let path = chart.step_path();
        // anchor + 4 points, each after the first adds a horizontal vertex
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], (0.0, 1.0));
        assert_eq!(path[1], (0.5, 1.0));
        assert_eq!(path[2], (0.5, 1.0));
    }

    #[test]
    fn every_second_threshold_annotated() {
        let chart = PrecisionRecallChart::new(&curve());
        let labelled: Vec<f64> = chart.annotated().map(|p| p.threshold).collect();
        assert_eq!(labelled, vec![0.9, 0.5]);
    }

    #[test]
    fn title_carries_average_precision() {
        let chart = PrecisionRecallChart::new(&curve());
        assert_eq!(chart.title(), "2-class Precision-Recall curve: AP=0.83");
    }

    #[test]
    fn renders_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.svg");
        render(&path, &PrecisionRecallChart::new(&curve())).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Recall"));
        assert!(svg.contains("0.90"));
    }
}
