//! Chart spec engine.
//!
//! Turns a [`ResultTable`] plus a chart type and role bindings into a
//! [`ChartSpec`]:
//!
//! ```
//! use sqlreport::chart::{create_chart, ChartTheme, ChartType, RoleBindings};
//! use sqlreport::table::{ResultTable, Value};
//!
//! let table = ResultTable::new(
//!     vec!["zone".into(), "usage".into()],
//!     vec![
//!         vec![Value::from("A"), Value::from(10_i64)],
//!         vec![Value::from("B"), Value::from(4_i64)],
//!     ],
//! )
//! .unwrap();
//!
//! let spec = create_chart(
//!     &table,
//!     ChartType::Bar,
//!     &RoleBindings::new().x("zone").y("usage"),
//!     &ChartTheme::default(),
//! )
//! .unwrap();
//! assert_eq!(spec.title(), "usage by zone");
//! ```

mod builders;
pub mod dashboard;
pub mod plotly;
mod recommend;
mod spec;
mod theme;

pub use dashboard::{dashboard, Dashboard, Panel};
pub use recommend::{recommend, ChartRecommendation};
pub use spec::{
    Aggregation, Axis, BarMode, ChartSpec, Dash, Fill, Layout, LineStyle, Mode, ReferenceLine,
    Trace, TraceKind,
};
pub use theme::{ChartTheme, Margin};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::ResultTable;

// =============================================================================
// Chart Types and Roles
// =============================================================================

/// Supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
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

impl ChartType {
    pub const ALL: [ChartType; 9] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Scatter,
        ChartType::Pie,
        ChartType::Histogram,
        ChartType::Box,
        ChartType::Heatmap,
        ChartType::Area,
        ChartType::Treemap,
    ];

    /// Display label, e.g. `"Scatter Plot"`.
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Line => "Line Chart",
            ChartType::Scatter => "Scatter Plot",
            ChartType::Pie => "Pie Chart",
            ChartType::Histogram => "Histogram",
            ChartType::Box => "Box Plot",
            ChartType::Heatmap => "Heatmap",
            ChartType::Area => "Area Chart",
            ChartType::Treemap => "Treemap",
        }
    }

    /// Roles that must be bound before the chart can be built.
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            ChartType::Bar | ChartType::Line | ChartType::Scatter | ChartType::Area => {
                &[Role::X, Role::Y]
            }
            ChartType::Pie | ChartType::Treemap => &[Role::Label, Role::Value],
            ChartType::Histogram | ChartType::Box => &[Role::X],
            ChartType::Heatmap => &[],
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartType {
    type Err = ChartBuildError;

    /// Accepts display labels (`"Bar Chart"`) and short names (`"bar"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "bar" | "bar chart" => Ok(ChartType::Bar),
            "line" | "line chart" => Ok(ChartType::Line),
            "scatter" | "scatter plot" => Ok(ChartType::Scatter),
            "pie" | "pie chart" => Ok(ChartType::Pie),
            "histogram" => Ok(ChartType::Histogram),
            "box" | "box plot" => Ok(ChartType::Box),
            "heatmap" => Ok(ChartType::Heatmap),
            "area" | "area chart" => Ok(ChartType::Area),
            "treemap" => Ok(ChartType::Treemap),
            _ => Err(ChartBuildError::UnknownChartType(s.to_string())),
        }
    }
}

/// Semantic slot a column can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    X,
    Y,
    Color,
    Size,
    Label,
    Value,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::X => "x",
            Role::Y => "y",
            Role::Color => "color",
            Role::Size => "size",
            Role::Label => "label",
            Role::Value => "value",
        })
    }
}

/// What a column picker shows when no column is chosen.
pub const UNSET: &str = "None";

/// Column names bound to chart roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleBindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RoleBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, column: &str) -> Self {
        self.x = Some(column.to_string());
        self
    }

    pub fn y(mut self, column: &str) -> Self {
        self.y = Some(column.to_string());
        self
    }

    pub fn color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    pub fn size(mut self, column: &str) -> Self {
        self.size = Some(column.to_string());
        self
    }

    pub fn label(mut self, column: &str) -> Self {
        self.label = Some(column.to_string());
        self
    }

    pub fn value(mut self, column: &str) -> Self {
        self.value = Some(column.to_string());
        self
    }

    /// Column bound to `role`. Blank names count as unbound, and so does
    /// [`UNSET`] for color, size and label.
    pub fn get(&self, role: Role) -> Option<&str> {
        let bound = match role {
            Role::X => &self.x,
            Role::Y => &self.y,
            Role::Color => &self.color,
            Role::Size => &self.size,
            Role::Label => &self.label,
            Role::Value => &self.value,
        };
        bound.as_deref().filter(|c| match c.trim() {
            "" => false,
            UNSET => !matches!(role, Role::Color | Role::Size | Role::Label),
            _ => true,
        })
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a chart could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartBuildError {
    #[error("Cannot build a chart from an empty table")]
    EmptyTable,

    #[error("{chart_type} requires a {role} column")]
    MissingRole { chart_type: ChartType, role: Role },

    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Column {column} used as {role} must be numeric")]
    NotNumeric { column: String, role: Role },

    #[error("Heatmap requires at least one numeric column")]
    NoNumericColumns,

    #[error("Cannot fit a trendline: {0}")]
    Degenerate(String),

    #[error("Unsupported chart type: {0}")]
    UnknownChartType(String),
}

// =============================================================================
// Entry Point
// =============================================================================

/// Build a chart spec for `table`.
///
/// Fails on an empty table, an unbound required role, a binding to a column
/// the table does not have, or a non-numeric column where numbers are needed.
pub fn create_chart(
    table: &ResultTable,
    chart_type: ChartType,
    bindings: &RoleBindings,
    theme: &ChartTheme,
) -> Result<ChartSpec, ChartBuildError> {
    if table.is_empty() {
        return Err(ChartBuildError::EmptyTable);
    }

    for &role in chart_type.required_roles() {
        if bindings.get(role).is_none() {
            return Err(ChartBuildError::MissingRole { chart_type, role });
        }
    }

    let ctx = builders::Context {
        table,
        bindings,
        chart_type,
        theme,
    };

    let spec = match chart_type {
        ChartType::Bar => builders::bar(&ctx),
        ChartType::Line => builders::line(&ctx),
        ChartType::Scatter => builders::scatter(&ctx),
        ChartType::Pie => builders::proportional(&ctx, TraceKind::Pie),
        ChartType::Histogram => builders::histogram(&ctx),
        ChartType::Box => builders::box_plot(&ctx),
        ChartType::Heatmap => builders::heatmap(&ctx),
        ChartType::Area => builders::area(&ctx),
        ChartType::Treemap => builders::proportional(&ctx, TraceKind::Treemap),
    }?;

    debug!(
        chart = %chart_type,
        traces = spec.traces.len(),
        rows = table.row_count(),
        "Built chart"
    );

    Ok(spec)
}
