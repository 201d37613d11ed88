//! Renderer-neutral chart description.
//!
//! A [`ChartSpec`] says what to draw: trace kinds, their data, derived
//! series and style hints. It carries no renderer vocabulary; see
//! [`super::plotly`] for one translation.

use serde::Serialize;

use super::theme::ChartTheme;
use super::ChartType;
use crate::table::stats::LinearFit;
use crate::table::Value;

// =============================================================================
// Traces
// =============================================================================

/// Kind of mark a trace draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Bar,
    Line,
    Scatter,
    Pie,
    Histogram,
    Box,
    Heatmap,
    Area,
    Treemap,
}

/// How points are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Markers,
    Lines,
    LinesMarkers,
}

/// Area fill target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Down to y = 0.
    ToZeroY,
    /// Down to the previous trace in the stack.
    ToNextY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    #[default]
    Solid,
    Dash,
    Dot,
}

/// Aggregation the renderer should apply, or that was applied already.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Values were summed per label before building the trace.
    Sum,
    /// Renderer counts observations per bin.
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Option<String>,
    pub dash: Dash,
    pub width: f64,
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<Value>,
    /// Heatmap cells, row-major over `y` then `x`. `None` where undefined.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub z: Vec<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
    /// Marker sizes for bubble charts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    /// Stack with the other traces that set this.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stacked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Per-slice colors for pie and treemap traces.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    /// Fitted line for trendline traces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<LinearFit>,
}

impl Trace {
    pub fn new(kind: TraceKind) -> Self {
        Self {
            kind,
            name: None,
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            labels: Vec::new(),
            values: Vec::new(),
            sizes: Vec::new(),
            mode: None,
            fill: None,
            stacked: false,
            color: None,
            colors: Vec::new(),
            line: None,
            marker_size: None,
            bins: None,
            aggregation: None,
            text_info: None,
            color_scale: None,
            fit: None,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<i32>,
}

impl Axis {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            tick_angle: None,
        }
    }
}

/// A vertical marker at `x = value`, e.g. a mean line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
    pub color: String,
    pub dash: Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    pub theme: ChartTheme,
}

impl Layout {
    pub fn new(title: impl Into<String>, theme: &ChartTheme) -> Self {
        Self {
            title: title.into(),
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            reference_lines: Vec::new(),
            bar_mode: None,
            theme: theme.clone(),
        }
    }
}

// =============================================================================
// Chart Spec
// =============================================================================

/// A complete chart: what to draw and how to lay it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    /// Replace the default title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.layout.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.layout.title
    }

    /// Trace with the given name, e.g. `"Trend"`.
    pub fn trace_named(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name.as_deref() == Some(name))
    }
}
