//! Class-conditional score distribution chart.

use plotters::coord::Shift;
use plotters::prelude::*;
use sift_core::Result;
use sift_stats::density::ClassDensities;
use sift_stats::{Dataset, LabelPolicy};

use crate::{Chart, DrawResult};

const POSITIVE_COLOR: RGBColor = RGBColor(106, 204, 100);
const NEGATIVE_COLOR: RGBColor = RGBColor(214, 95, 95);
const GRID_POINTS: usize = 256;
/// Bandwidths the curves extend past the outermost samples.
const CUT: f64 = 3.0;

/// Filled KDE curves for both classes with a rug of the raw scores.
#[derive(Debug, Clone)]
pub struct DistributionChart {
    negative: Vec<(f64, f64)>,
    positive: Vec<(f64, f64)>,
    negative_scores: Vec<f64>,
    positive_scores: Vec<f64>,
    x_range: (f64, f64),
    y_max: f64,
}

impl DistributionChart {
    /// Estimate both class densities of `data`.
    ///
    /// # Errors
    ///
    /// Fails with `DegenerateLabels` when a class has too few distinct
    /// scores to estimate.
    pub fn new(data: &Dataset, policy: LabelPolicy) -> Result<Self> {
        let densities = ClassDensities::estimate(data, policy)?;
        let (lo, hi) = densities.support(CUT);
        let negative = densities.negative.grid(lo, hi, GRID_POINTS);
        let positive = densities.positive.grid(lo, hi, GRID_POINTS);
        let y_max = negative
            .iter()
            .chain(&positive)
            .map(|&(_, y)| y)
            .fold(0.0, f64::max);

        Ok(Self {
            negative,
            positive,
            negative_scores: densities.negative.samples().to_vec(),
            positive_scores: densities.positive.samples().to_vec(),
            x_range: (lo, hi),
            y_max: y_max * 1.1,
        })
    }
}

impl Chart for DistributionChart {
    fn size(&self) -> (u32, u32) {
        (640, 480)
    }

    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let (lo, hi) = self.x_range;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(lo..hi, 0.0..self.y_max)?;
        chart
            .configure_mesh()
            .x_desc("Feature value z = f(x)")
            .y_desc("Value probability")
            .draw()?;

        let rug = self.y_max * 0.03;
        for (curve, scores, color) in [
            (&self.positive, &self.positive_scores, POSITIVE_COLOR),
            (&self.negative, &self.negative_scores, NEGATIVE_COLOR),
        ] {
            chart.draw_series(
                AreaSeries::new(curve.iter().copied(), 0.0, color.mix(0.25))
                    .border_style(color.stroke_width(2)),
            )?;
            chart.draw_series(
                scores
                    .iter()
                    .map(|&x| PathElement::new(vec![(x, 0.0), (x, rug)], color)),
            )?;
        }

        root.present()?;
        Ok(())
    }
}
