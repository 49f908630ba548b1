//! Confusion-matrix heatmap.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use sift_stats::metrics::ConfusionMatrix;

use crate::{Chart, DrawResult};

const ROW_LABELS: [&str; 2] = ["Negative", "Positive"];
const COL_LABELS: [&str; 2] = ["Predicted negative", "Predicted positive"];

/// Yellow-green-blue sequential palette, light to dark.
const PALETTE: [(u8, u8, u8); 9] = [
    (255, 255, 217),
    (237, 248, 177),
    (199, 233, 180),
    (127, 205, 187),
    (65, 182, 196),
    (29, 145, 192),
    (34, 94, 168),
    (37, 52, 148),
    (8, 29, 88),
];

/// Color for `t` in `[0, 1]`, linearly interpolated over [`PALETTE`].
pub fn heat_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (PALETTE.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(PALETTE.len() - 2);
    let frac = scaled - i as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (PALETTE[i], PALETTE[i + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// 2x2 annotated heatmap, actual class by row and prediction by column.
#[derive(Debug, Clone)]
pub struct ConfusionChart {
    rows: [[usize; 2]; 2],
    threshold: f64,
}

impl ConfusionChart {
    pub fn new(matrix: &ConfusionMatrix, threshold: f64) -> Self {
        Self {
            rows: matrix.as_rows(),
            threshold,
        }
    }

    pub fn title(&self) -> String {
        format!("Confusion matrix for Θ={}", self.threshold)
    }

    fn max_count(&self) -> usize {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }
}

impl Chart for ConfusionChart {
    fn size(&self) -> (u32, u32) {
        (640, 560)
    }

    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let area = root.titled(&self.title(), ("sans-serif", 22))?;

        let (width, height) = area.dim_in_pixel();
        let left = 110i32;
        let bottom = 60i32;
        let bar = 70i32;
        let cell = ((width as i32 - left - bar - 20).min(height as i32 - bottom - 20) / 2).max(1);
        let top = 10i32;

        let max = self.max_count().max(1) as f64;
        let centered = Pos::new(HPos::Center, VPos::Center);

        for (r, row) in self.rows.iter().enumerate() {
            for (c, &count) in row.iter().enumerate() {
                let x0 = left + c as i32 * cell;
                let y0 = top + r as i32 * cell;
                let t = count as f64 / max;
                area.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell, y0 + cell)],
                    heat_color(t).filled(),
                ))?;
                let ink = if t > 0.5 { WHITE } else { BLACK };
                area.draw(&Text::new(
                    count.to_string(),
                    (x0 + cell / 2, y0 + cell / 2),
                    ("sans-serif", 24).into_font().color(&ink).pos(centered),
                ))?;
            }
        }

        let label_style = ("sans-serif", 14).into_font().color(&BLACK);
        for (i, label) in ROW_LABELS.iter().enumerate() {
            area.draw(&Text::new(
                *label,
                (left - 8, top + i as i32 * cell + cell / 2),
                label_style.pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
        for (i, label) in COL_LABELS.iter().enumerate() {
            area.draw(&Text::new(
                *label,
                (left + i as i32 * cell + cell / 2, top + 2 * cell + 8),
                label_style.pos(Pos::new(HPos::Center, VPos::Top)),
            ))?;
        }

        // color bar
        let bar_x = left + 2 * cell + 20;
        let steps = 64;
        let span = 2 * cell;
        for s in 0..steps {
            let y0 = top + span - (s + 1) * span / steps;
            let y1 = top + span - s * span / steps;
            area.draw(&Rectangle::new(
                [(bar_x, y0), (bar_x + 16, y1)],
                heat_color(s as f64 / (steps - 1) as f64).filled(),
            ))?;
        }
        let tick_style = label_style.pos(Pos::new(HPos::Left, VPos::Center));
        area.draw(&Text::new("0", (bar_x + 22, top + span), tick_style.clone()))?;
        area.draw(&Text::new(
            self.max_count().to_string(),
            (bar_x + 22, top),
            tick_style,
        ))?;

        root.present()?;
        Ok(())
    }
}
