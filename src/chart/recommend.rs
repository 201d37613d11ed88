//! Chart suggestions from a table's column types.

use serde::Serialize;

use super::{ChartType, RoleBindings};
use crate::table::ResultTable;

/// A suggested chart with the bindings that would build it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRecommendation {
    pub chart_type: ChartType,
    pub reason: String,
    pub bindings: RoleBindings,
}

impl ChartRecommendation {
    fn new(chart_type: ChartType, reason: &str, bindings: RoleBindings) -> Self {
        Self {
            chart_type,
            reason: reason.to_string(),
            bindings,
        }
    }
}

/// Suggest charts for `table`. Advisory only; nothing is built.
///
/// Rules apply in order and independently:
/// datetime + numeric suggests a line chart, categorical + numeric a bar and
/// a pie chart, two numeric columns a scatter plot and a heatmap, and any
/// numeric column a histogram and a box plot.
pub fn recommend(table: &ResultTable) -> Vec<ChartRecommendation> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();
    let datetime = table.datetime_columns();
    let name = |idx: usize| table.column_name(idx);

    let mut out = Vec::new();

    if let (Some(&d), Some(&n)) = (datetime.first(), numeric.first()) {
        out.push(ChartRecommendation::new(
            ChartType::Line,
            "Ideal for showing trends over time",
            RoleBindings::new().x(name(d)).y(name(n)),
        ));
    }

    if let (Some(&c), Some(&n)) = (categorical.first(), numeric.first()) {
        out.push(ChartRecommendation::new(
            ChartType::Bar,
            "Great for comparing categories",
            RoleBindings::new().x(name(c)).y(name(n)),
        ));
        out.push(ChartRecommendation::new(
            ChartType::Pie,
            "Shows proportion of categories",
            RoleBindings::new().label(name(c)).value(name(n)),
        ));
    }

    if let &[first, second, ..] = numeric.as_slice() {
        out.push(ChartRecommendation::new(
            ChartType::Scatter,
            "Reveals relationships between variables",
            RoleBindings::new().x(name(first)).y(name(second)),
        ));
        out.push(ChartRecommendation::new(
            ChartType::Heatmap,
            "Shows correlations between all numeric variables",
            RoleBindings::new(),
        ));
    }

    if let Some(&n) = numeric.first() {
        out.push(ChartRecommendation::new(
            ChartType::Histogram,
            "Shows data distribution",
            RoleBindings::new().x(name(n)),
        ));
        out.push(ChartRecommendation::new(
            ChartType::Box,
            "Identifies outliers and quartiles",
            RoleBindings::new().x(name(n)),
        ));
    }

    out
}
