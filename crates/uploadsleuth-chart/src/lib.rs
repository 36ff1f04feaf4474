/// UploadSleuth Chart: renders a frequency series to disk.
///
/// This crate contains only presentation code. It accepts the dense, ordered
/// series produced by `uploadsleuth-core` and writes one artifact:
///
/// - [`html`]: interactive Plotly document.
/// - [`png`]: static bar-chart raster.
/// - [`table`]: CSV rows for spreadsheets and scripts.
pub mod error;
mod glyphs;
pub mod html;
mod output;
pub mod png;
pub mod table;

pub use error::{ChartError, Result};

use std::path::Path;
use tracing::info;
use uploadsleuth_core::config::ChartFormat;
use uploadsleuth_core::model::FrequencySeries;

/// Rendering options that do not affect the data.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    /// Raster size in pixels; only used for PNG.
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Upload frequency".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Render `series` as `format` into `path`, replacing any existing file.
pub fn render(
    series: &FrequencySeries,
    format: ChartFormat,
    path: &Path,
    options: &ChartOptions,
) -> Result<()> {
    output::write_atomically(path, |out| match format {
        ChartFormat::Html => html::write_html(out, series, &options.title),
        ChartFormat::Png => png::write_png(out, series, options.width, options.height),
        ChartFormat::Csv => table::write_csv(out, series),
    })?;
    info!(
        buckets = series.len(),
        total = series.total(),
        "Chart written to {}",
        path.display()
    );
    Ok(())
}
