//! Colour tokens shared by the PNG and terminal charts.

use ratatui::style::Color;

/// Chart palette
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Bar fill (sky blue)
    pub bar: Color,
    /// Border and title accent
    pub accent: Color,
    /// Rate labels printed on the bars
    pub value: Color,
    /// Symbol labels under the bars
    pub text_primary: Color,
    /// Hints and empty-state text
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::sky()
    }
}

impl Theme {
    pub fn sky() -> Self {
        Self {
            bar: Color::Rgb(135, 206, 235),
            accent: Color::Rgb(0, 255, 255),
            value: Color::Black,
            text_primary: Color::White,
            muted: Color::Rgb(100, 149, 237),
        }
    }

    /// The bar colour as RGB, for the bitmap renderer.
    pub fn bar_rgb(&self) -> (u8, u8, u8) {
        match self.bar {
            Color::Rgb(r, g, b) => (r, g, b),
            _ => (135, 206, 235),
        }
    }
}
