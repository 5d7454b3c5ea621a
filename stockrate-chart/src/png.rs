//! PNG rendering with plotters.
//!
//! The canvas is 6.4 × 4.8 inches at the requested dpi; font sizes are in
//! points and scaled by `dpi / 72`.

use std::path::Path;

use plotters::prelude::*;
use stockrate_core::ResultTable;

use crate::options::RenderOptions;
use crate::theme::Theme;
use crate::ChartError;

const FIGURE_WIDTH_IN: f64 = 6.4;
const FIGURE_HEIGHT_IN: f64 = 4.8;
const FONT: &str = "sans-serif";

/// Pixel dimensions of the canvas for `dpi`.
pub fn canvas_size(dpi: u32) -> (u32, u32) {
    let dpi = dpi as f64;
    (
        (FIGURE_WIDTH_IN * dpi).round() as u32,
        (FIGURE_HEIGHT_IN * dpi).round() as u32,
    )
}

/// Y range covering every finite rate and zero, with headroom above.
pub fn y_range(table: &ResultTable) -> (f64, f64) {
    let finite = || table.records().iter().map(|r| r.rate).filter(|r| r.is_finite());
    let lo = finite().fold(0.0, f64::min);
    let hi = finite().fold(0.0, f64::max);
    let top = if hi > 0.0 { hi * 1.05 } else { 1.0 };
    let bottom = if lo < 0.0 { lo * 1.05 } else { 0.0 };
    (bottom, top)
}

fn draw_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Draw `table` as a bar chart into a PNG at `path`.
pub fn write_png(
    table: &ResultTable,
    opts: &RenderOptions,
    path: &Path,
) -> Result<(), ChartError> {
    let (width, height) = canvas_size(opts.dpi);
    let font_px = (opts.font_size * opts.dpi as f64 / 72.0).max(1.0);
    let records = table.records();
    let n = records.len().max(1);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let longest = records.iter().map(|r| r.symbol.len()).max().unwrap_or(1) as f64;
    let (y_lo, y_hi) = y_range(table);

    let mut chart = ChartBuilder::on(&root)
        .caption("Stock Ratings", (FONT, font_px))
        .margin((font_px * 2.0) as u32)
        .x_label_area_size((font_px * (longest * 0.7 + 3.0)) as u32)
        .y_label_area_size((font_px * 5.0) as u32)
        .build_cartesian_2d((0..n).into_segmented(), y_lo..y_hi)
        .map_err(draw_error)?;

    let symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
    let label_for = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => symbols.get(*i).map(|s| s.to_string()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n)
        .x_label_formatter(&label_for)
        .x_label_style((FONT, font_px).into_font().transform(FontTransform::Rotate90))
        .y_label_style((FONT, font_px))
        .axis_desc_style((FONT, font_px))
        .x_desc("Symbol")
        .y_desc("Rate")
        .draw()
        .map_err(draw_error)?;

    let slot_px = chart.plotting_area().dim_in_pixel().0 as f64 / n as f64;
    let margin = ((1.0 - opts.bar_width).max(0.0) * slot_px / 2.0).round() as u32;
    let (r, g, b) = Theme::default().bar_rgb();

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(RGBColor(r, g, b).filled())
                .margin(margin)
                .data(
                    records
                        .iter()
                        .enumerate()
                        .filter(|(_, rec)| rec.rate.is_finite())
                        .map(|(i, rec)| (i, rec.rate)),
                ),
        )
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockrate_core::StockRecord;

    #[test]
    fn canvas_scales_with_dpi() {
        assert_eq!(canvas_size(100), (640, 480));
        assert_eq!(canvas_size(700), (4480, 3360));
    }

    #[test]
    fn y_range_includes_zero() {
        let table = ResultTable::new(vec![
            StockRecord::new(2.0, "A"),
            StockRecord::new(4.0, "B"),
        ]);
        let (lo, hi) = y_range(&table);
        assert_eq!(lo, 0.0);
        assert!((hi - 4.2).abs() < 1e-9);
    }

    #[test]
    fn y_range_of_empty_table() {
        assert_eq!(y_range(&ResultTable::default()), (0.0, 1.0));
    }
}
