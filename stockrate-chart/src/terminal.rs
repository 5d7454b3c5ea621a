//! Interactive terminal view of a rate table.
//!
//! Draws one bar per record in table order and waits for `q` or `Esc`.
//! The terminal is restored even when drawing fails.

use std::io::{self, stdout};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget};
use ratatui::Terminal;
use stockrate_core::ResultTable;

use crate::options::RenderOptions;
use crate::theme::Theme;

/// Rates are fractional; bars are drawn from hundredths.
const VALUE_SCALE: f64 = 100.0;

/// Bar chart widget over a [`ResultTable`].
pub struct RateChart<'a> {
    table: &'a ResultTable,
    bar_width: f64,
    theme: &'a Theme,
}

impl<'a> RateChart<'a> {
    pub fn new(table: &'a ResultTable, opts: &RenderOptions, theme: &'a Theme) -> Self {
        Self {
            table,
            bar_width: opts.bar_width,
            theme,
        }
    }
}

/// Split `width` columns into `n` slots; returns (bar width, gap).
pub fn column_layout(width: u16, n: usize, fraction: f64) -> (u16, u16) {
    if n == 0 {
        return (1, 0);
    }
    let slot = (width as usize / n).max(1) as f64;
    let bar = (slot * fraction).round().clamp(1.0, slot) as u16;
    let gap = (slot as u16).saturating_sub(bar);
    (bar, gap)
}

fn scaled(rate: f64) -> u64 {
    if rate.is_finite() && rate > 0.0 {
        (rate * VALUE_SCALE).round() as u64
    } else {
        0
    }
}

impl Widget for RateChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .title(" Stock Ratings ")
            .title_bottom(
                Line::from(" q / Esc to close ").style(Style::default().fg(self.theme.muted)),
            );

        if self.table.is_empty() {
            Paragraph::new("No Data")
                .style(Style::default().fg(self.theme.muted))
                .block(block)
                .render(area, buf);
            return;
        }

        let bars: Vec<Bar> = self
            .table
            .records()
            .iter()
            .map(|r| {
                Bar::default()
                    .label(Line::from(r.symbol.clone()))
                    .value(scaled(r.rate))
                    .text_value(format!("{:.2}", r.rate))
                    .style(Style::default().fg(self.theme.bar))
                    .value_style(
                        Style::default()
                            .fg(self.theme.value)
                            .bg(self.theme.bar)
                            .add_modifier(Modifier::BOLD),
                    )
            })
            .collect();

        let inner_width = area.width.saturating_sub(2);
        let (bar_width, bar_gap) = column_layout(inner_width, bars.len(), self.bar_width);

        BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(bar_gap)
            .label_style(Style::default().fg(self.theme.text_primary))
            .render(area, buf);
    }
}

/// Show the chart full-screen until the user closes it.
pub fn show(table: &ResultTable, opts: &RenderOptions) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    let result = Terminal::new(CrosstermBackend::new(stdout)).and_then(|mut terminal| {
        let shown = run(&mut terminal, table, opts);
        let _ = terminal.show_cursor();
        shown
    });

    // Both restore steps run even if the first fails.
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen);
    first_error([result, raw, screen])
}

fn first_error<const N: usize>(steps: [io::Result<()>; N]) -> io::Result<()> {
    steps.into_iter().collect()
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    table: &ResultTable,
    opts: &RenderOptions,
) -> io::Result<()> {
    let theme = Theme::default();
    terminal.clear()?;
    loop {
        terminal.draw(|f| f.render_widget(RateChart::new(table, opts, &theme), f.area()))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockrate_core::StockRecord;

    fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        content
    }

    #[test]
    fn renders_symbols_in_table_order() {
        let theme = Theme::default();
        let table = ResultTable::new(vec![
            StockRecord::new(1.2, "BBB"),
            StockRecord::new(3.1, "AAA"),
        ]);
        let chart = RateChart::new(&table, &RenderOptions::default(), &theme);

        let area = Rect::new(0, 0, 40, 16);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        let content = buffer_text(&buf, area);
        let bbb = content.find("BBB").unwrap();
        let aaa = content.find("AAA").unwrap();
        assert!(bbb < aaa);
        assert!(content.contains("Stock Ratings"));
    }

    #[test]
    fn empty_table_renders_placeholder() {
        let theme = Theme::default();
        let table = ResultTable::default();
        let chart = RateChart::new(&table, &RenderOptions::default(), &theme);

        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        assert!(buffer_text(&buf, area).contains("No Data"));
    }

    #[test]
    fn layout_respects_fraction() {
        assert_eq!(column_layout(100, 10, 0.6), (6, 4));
        assert_eq!(column_layout(100, 10, 1.0), (10, 0));
        // Too many bars for the width still gives one column each.
        assert_eq!(column_layout(5, 10, 0.6), (1, 0));
        assert_eq!(column_layout(80, 0, 0.6), (1, 0));
    }

    #[test]
    fn restore_reports_first_failure() {
        let err = first_error([
            Ok(()),
            Err(io::Error::new(io::ErrorKind::Other, "raw mode")),
            Err(io::Error::new(io::ErrorKind::Other, "alternate screen")),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "raw mode");
        assert!(first_error([Ok(()), Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn negative_and_nan_rates_draw_empty_bars() {
        assert_eq!(scaled(-1.0), 0);
        assert_eq!(scaled(f64::NAN), 0);
        assert_eq!(scaled(2.5), 250);
    }
}
