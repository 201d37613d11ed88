//! Visual theme applied to every chart.

use serde::{Deserialize, Serialize};

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            left: 50,
            right: 50,
            top: 80,
            bottom: 50,
        }
    }
}

/// Fonts, colors and sizing shared by all charts in a report.
///
/// Passed by reference into every chart build. Loaded from the `[chart]`
/// table of the settings file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTheme {
    /// Series colors, assigned in order and cycled.
    pub palette: Vec<String>,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
    pub title_font_size: u32,
    pub title_font_color: String,
    pub paper_background: String,
    pub plot_background: String,
    pub grid_color: String,
    pub line_color: String,
    pub height: u32,
    pub margin: Margin,
    pub show_legend: bool,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            palette: ["#0077be", "#00a8cc", "#7fb069", "#4a90a4", "#2e5984", "#1e3a5f"]
                .into_iter()
                .map(String::from)
                .collect(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12,
            font_color: "#2e2e2e".to_string(),
            title_font_size: 16,
            title_font_color: "#1e1e1e".to_string(),
            paper_background: "white".to_string(),
            plot_background: "white".to_string(),
            grid_color: "#e6e6e6".to_string(),
            line_color: "#d1d1d1".to_string(),
            height: 500,
            margin: Margin::default(),
            show_legend: true,
        }
    }
}

impl ChartTheme {
    /// Palette color for the `i`th series.
    pub fn color(&self, i: usize) -> String {
        if self.palette.is_empty() {
            return "#0077be".to_string();
        }
        self.palette[i % self.palette.len()].clone()
    }

    /// The first `n` palette colors, cycling when `n` exceeds the palette.
    pub fn colors(&self, n: usize) -> Vec<String> {
        (0..n).map(|i| self.color(i)).collect()
    }
}
