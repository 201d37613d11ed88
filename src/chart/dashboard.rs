//! Grid layout for several charts on one page.

use serde::Serialize;

use super::ChartSpec;

const ROW_HEIGHT: u32 = 300;

/// A chart placed in a grid cell. Rows and columns are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub row: usize,
    pub col: usize,
    pub title: String,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub height: u32,
    pub show_legend: bool,
    pub panels: Vec<Panel>,
}

/// Grid shape for `n` charts.
fn grid(n: usize) -> (usize, usize) {
    match n {
        0..=2 => (1, n),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        _ => (3, 3),
    }
}

/// Lay charts out row by row. Charts beyond a 3x3 grid are dropped.
///
/// Returns `None` when there is nothing to show.
pub fn dashboard(charts: Vec<ChartSpec>) -> Option<Dashboard> {
    if charts.is_empty() {
        return None;
    }

    let (rows, cols) = grid(charts.len());
    let panels = charts
        .into_iter()
        .take(rows * cols)
        .enumerate()
        .map(|(i, chart)| Panel {
            row: i / cols,
            col: i % cols,
            title: format!("Chart {}", i + 1),
            chart,
        })
        .collect();

    Some(Dashboard {
        title: "Dashboard Overview".to_string(),
        rows,
        cols,
        height: ROW_HEIGHT * rows as u32,
        show_legend: false,
        panels,
    })
}
