//! StockRate Chart — bar charts of a rate table.
//!
//! Two outputs share one set of [`RenderOptions`]:
//! - a dated PNG under the results directory (plotters)
//! - an interactive full-screen view (ratatui + crossterm)

pub mod options;
pub mod png;
pub mod terminal;
pub mod theme;

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use stockrate_core::ResultTable;

pub use options::{dated_plot_path, RenderOptions};
pub use terminal::RateChart;
pub use theme::Theme;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("cannot create results directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Render `table` as configured.
///
/// Returns the written path when `opts.save` is set; otherwise blocks in the
/// terminal view until it is closed and returns `None`.
pub fn render(table: &ResultTable, opts: &RenderOptions) -> Result<Option<PathBuf>, ChartError> {
    if opts.save {
        let today = chrono::Local::now().date_naive();
        save_png(table, opts, today).map(Some)
    } else {
        terminal::show(table, opts)?;
        Ok(None)
    }
}

/// Write the dated PNG for `date`, creating the results directory first.
///
/// `opts.filename` is ignored; the file is always `plot_<DD-MM-YYYY>.png`.
pub fn save_png(
    table: &ResultTable,
    opts: &RenderOptions,
    date: NaiveDate,
) -> Result<PathBuf, ChartError> {
    ensure_dir(&opts.results_dir)?;
    let path = opts.dated_path(date);
    png::write_png(table, opts, &path)?;
    log::info!("Figure saved as {}", path.display());
    Ok(path)
}

fn ensure_dir(dir: &Path) -> Result<(), ChartError> {
    std::fs::create_dir_all(dir).map_err(|source| ChartError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
