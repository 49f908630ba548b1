//! Chart rendering for sift reports.
//!
//! Every chart implements [`Chart`] and is written with [`render`], which
//! picks the plotters backend from the output file extension:
//!
//! - `.svg` — always available
//! - `.png` — requires the `png` feature

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use sift_core::{Result, SiftError};

pub mod confusion;
pub mod distribution;
pub mod precision_recall;

pub use confusion::ConfusionChart;
pub use distribution::DistributionChart;
pub use precision_recall::PrecisionRecallChart;

/// Fallible drawing result; plotters errors are boxed and mapped to
/// [`SiftError::Render`] by [`render`].
pub type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// A chart that can draw itself onto any plotters backend.
pub trait Chart {
    /// Output size in pixels.
    fn size(&self) -> (u32, u32);

    /// Draw onto `root` and present it.
    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Image format selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    #[cfg(feature = "png")]
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            #[cfg(feature = "png")]
            Some("png") => Ok(OutputFormat::Png),
            #[cfg(not(feature = "png"))]
            Some("png") => Err(SiftError::Render(
                "PNG output requires the `png` feature".into(),
            )),
            _ => Err(SiftError::Render(format!(
                "{}: unsupported image extension (expected .svg or .png)",
                path.display()
            ))),
        }
    }
}

/// Render `chart` to `path`, overwriting any existing file.
pub fn render<C: Chart>(path: impl AsRef<Path>, chart: &C) -> Result<()> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let drawn = match format {
        OutputFormat::Svg => chart.draw(SVGBackend::new(path, chart.size()).into_drawing_area()),
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            chart.draw(BitMapBackend::new(path, chart.size()).into_drawing_area())
        }
    };
    drawn.map_err(|e| SiftError::Render(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), "chart written");
    Ok(())
}
