use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use stockrate_core::config::PlotConfig;

/// How to render a rate chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Write a PNG file instead of opening the interactive view.
    pub save: bool,
    /// Requested file name. Replaced by a dated name when saving.
    pub filename: String,
    /// Bar width as a fraction of one category slot.
    pub bar_width: f64,
    /// Label font size in points.
    pub font_size: f64,
    pub dpi: u32,
    pub results_dir: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&PlotConfig::default())
    }
}

impl From<&PlotConfig> for RenderOptions {
    fn from(config: &PlotConfig) -> Self {
        Self {
            save: config.save,
            filename: config.filename.clone(),
            bar_width: config.bar_width,
            font_size: config.font_size,
            dpi: config.dpi,
            results_dir: config.results_dir.clone(),
        }
    }
}

impl RenderOptions {
    /// `<results_dir>/plot_<DD-MM-YYYY>.png` for the given day.
    pub fn dated_path(&self, date: NaiveDate) -> PathBuf {
        dated_plot_path(&self.results_dir, date)
    }
}

pub fn dated_plot_path(results_dir: &Path, date: NaiveDate) -> PathBuf {
    results_dir.join(format!("plot_{}.png", date.format("%d-%m-%Y")))
}
