//! One builder per chart type.

use inflector::Inflector;

use super::spec::{
    Aggregation, Axis, BarMode, ChartSpec, Dash, Fill, Layout, LineStyle, Mode, ReferenceLine,
    Trace, TraceKind,
};
use super::theme::ChartTheme;
use super::{ChartBuildError, ChartType, Role, RoleBindings};
use crate::table::stats::{self, linear_fit};
use crate::table::{ColumnType, ResultTable, Value};

const HISTOGRAM_BINS: u32 = 30;
const ROTATE_LABELS_ABOVE: usize = 5;

pub(crate) struct Context<'a> {
    pub table: &'a ResultTable,
    pub bindings: &'a RoleBindings,
    pub chart_type: ChartType,
    pub theme: &'a ChartTheme,
}

impl Context<'_> {
    fn lookup(&self, column: &str) -> Result<usize, ChartBuildError> {
        self.table
            .column_index(column)
            .ok_or_else(|| ChartBuildError::UnknownColumn(column.to_string()))
    }

    fn required(&self, role: Role) -> Result<usize, ChartBuildError> {
        let column = self.bindings.get(role).ok_or(ChartBuildError::MissingRole {
            chart_type: self.chart_type,
            role,
        })?;
        self.lookup(column)
    }

    fn optional(&self, role: Role) -> Result<Option<usize>, ChartBuildError> {
        self.bindings.get(role).map(|c| self.lookup(c)).transpose()
    }

    fn ensure_numeric(&self, idx: usize, role: Role) -> Result<usize, ChartBuildError> {
        if self.table.column_type(idx) == ColumnType::Numeric {
            Ok(idx)
        } else {
            Err(ChartBuildError::NotNumeric {
                column: self.name(idx).to_string(),
                role,
            })
        }
    }

    fn numeric(&self, role: Role) -> Result<usize, ChartBuildError> {
        let idx = self.required(role)?;
        self.ensure_numeric(idx, role)
    }

    fn name(&self, idx: usize) -> &str {
        self.table.column_name(idx)
    }

    fn axis_title(&self, idx: usize) -> String {
        self.name(idx).to_title_case()
    }

    fn layout(&self, title: String) -> Layout {
        Layout::new(title, self.theme)
    }

    fn spec(&self, traces: Vec<Trace>, layout: Layout) -> ChartSpec {
        ChartSpec {
            chart_type: self.chart_type,
            traces,
            layout,
        }
    }

    fn cells(&self, rows: &[usize], col: usize) -> Vec<Value> {
        rows.iter().map(|&r| self.table.rows()[r][col].clone()).collect()
    }

    fn numbers(&self, rows: &[usize], col: usize) -> Vec<Value> {
        rows.iter()
            .filter_map(|&r| self.table.rows()[r][col].as_f64())
            .map(Value::Float)
            .collect()
    }
}

/// Series for a chart: one per distinct `color` value among `rows` when
/// grouping is bound, else a single series named `name` over all of `rows`.
fn series(
    ctx: &Context<'_>,
    rows: &[usize],
    color: Option<usize>,
    name: &str,
) -> Vec<(String, Vec<usize>)> {
    match color {
        Some(c) => stats::group_rows(ctx.table, c, rows.iter().copied())
            .into_iter()
            .map(|(value, members)| (value.to_string(), members))
            .collect(),
        None => vec![(name.to_string(), rows.to_vec())],
    }
}

fn xy_traces(
    ctx: &Context<'_>,
    kind: TraceKind,
    groups: &[(String, Vec<usize>)],
    x: usize,
    y: usize,
) -> Vec<Trace> {
    groups
        .iter()
        .enumerate()
        .map(|(i, (name, members))| Trace {
            name: Some(name.clone()),
            x: ctx.cells(members, x),
            y: ctx.cells(members, y),
            color: Some(ctx.theme.color(i)),
            ..Trace::new(kind)
        })
        .collect()
}

fn all_rows(table: &ResultTable) -> Vec<usize> {
    (0..table.row_count()).collect()
}

// =============================================================================
// Builders
// =============================================================================

pub(crate) fn bar(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let x = ctx.required(Role::X)?;
    let y = ctx.required(Role::Y)?;
    let color = ctx.optional(Role::Color)?;

    let groups = series(ctx, &all_rows(ctx.table), color, ctx.name(y));
    let traces = xy_traces(ctx, TraceKind::Bar, &groups, x, y);

    let distinct_x = stats::nunique(ctx.table.values(x));
    let mut layout = ctx.layout(format!("{} by {}", ctx.name(y), ctx.name(x)));
    layout.x_axis = Axis {
        title: Some(ctx.axis_title(x)),
        tick_angle: Some(if distinct_x > ROTATE_LABELS_ABOVE { -45 } else { 0 }),
    };
    layout.y_axis = Axis::titled(ctx.axis_title(y));
    if color.is_some() {
        layout.bar_mode = Some(BarMode::Stack);
    }

    Ok(ctx.spec(traces, layout))
}

pub(crate) fn line(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let x = ctx.required(Role::X)?;
    let y = ctx.required(Role::Y)?;
    let color = ctx.optional(Role::Color)?;

    let groups = series(ctx, &ctx.table.sorted_indices(x), color, ctx.name(y));
    let traces = xy_traces(ctx, TraceKind::Line, &groups, x, y)
        .into_iter()
        .map(|t| Trace {
            mode: Some(Mode::LinesMarkers),
            marker_size: Some(6.0),
            ..t
        })
        .collect();

    let mut layout = ctx.layout(format!("{} Trend over {}", ctx.name(y), ctx.name(x)));
    layout.x_axis = Axis::titled(ctx.axis_title(x));
    layout.y_axis = Axis::titled(ctx.axis_title(y));

    Ok(ctx.spec(traces, layout))
}

pub(crate) fn scatter(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let x = ctx.numeric(Role::X)?;
    let y = ctx.numeric(Role::Y)?;
    let size = ctx
        .optional(Role::Size)?
        .map(|s| ctx.ensure_numeric(s, Role::Size))
        .transpose()?;
    let color = ctx.optional(Role::Color)?;

    // Only rows with both coordinates are plotted and fitted.
    let rows: Vec<usize> = (0..ctx.table.row_count())
        .filter(|&r| {
            let row = &ctx.table.rows()[r];
            row[x].as_f64().is_some() && row[y].as_f64().is_some()
        })
        .collect();

    let xs: Vec<f64> = rows.iter().filter_map(|&r| ctx.table.rows()[r][x].as_f64()).collect();
    let ys: Vec<f64> = rows.iter().filter_map(|&r| ctx.table.rows()[r][y].as_f64()).collect();
    let fit = linear_fit(&xs, &ys).ok_or_else(|| {
        ChartBuildError::Degenerate(format!(
            "{} needs at least two points with distinct {} values",
            ctx.name(y),
            ctx.name(x)
        ))
    })?;

    let groups = series(ctx, &rows, color, ctx.name(y));
    let mut traces: Vec<Trace> = xy_traces(ctx, TraceKind::Scatter, &groups, x, y)
        .into_iter()
        .map(|t| Trace {
            mode: Some(Mode::Markers),
            ..t
        })
        .collect();

    if let Some(s) = size {
        for (trace, (_, members)) in traces.iter_mut().zip(&groups) {
            trace.sizes = members
                .iter()
                .map(|&r| ctx.table.rows()[r][s].as_f64())
                .collect();
        }
    }

    let mut trend_x = xs.clone();
    trend_x.sort_by(f64::total_cmp);
    traces.push(Trace {
        name: Some("Trend".to_string()),
        y: trend_x.iter().map(|&v| Value::Float(fit.at(v))).collect(),
        x: trend_x.into_iter().map(Value::Float).collect(),
        mode: Some(Mode::Lines),
        line: Some(LineStyle {
            color: Some("red".to_string()),
            dash: Dash::Dash,
            width: 2.0,
        }),
        fit: Some(fit),
        ..Trace::new(TraceKind::Scatter)
    });

    let mut layout = ctx.layout(format!("{} vs {}", ctx.name(y), ctx.name(x)));
    layout.x_axis = Axis::titled(ctx.axis_title(x));
    layout.y_axis = Axis::titled(ctx.axis_title(y));

    Ok(ctx.spec(traces, layout))
}

/// Pie and treemap: one slice per distinct label, values summed.
pub(crate) fn proportional(
    ctx: &Context<'_>,
    kind: TraceKind,
) -> Result<ChartSpec, ChartBuildError> {
    let label = ctx.required(Role::Label)?;
    let value = ctx.numeric(Role::Value)?;

    let sums = stats::group_sum(ctx.table, label, value);
    let n = sums.len();
    let (labels, values): (Vec<Value>, Vec<f64>) = sums.into_iter().unzip();

    let mut trace = Trace {
        labels,
        values,
        colors: ctx.theme.colors(n),
        aggregation: Some(Aggregation::Sum),
        ..Trace::new(kind)
    };

    let title = if kind == TraceKind::Pie {
        trace.text_info = Some("percent+label".to_string());
        format!("Distribution of {} by {}", ctx.name(value), ctx.name(label))
    } else {
        format!("Treemap of {} by {}", ctx.name(value), ctx.name(label))
    };

    Ok(ctx.spec(vec![trace], ctx.layout(title)))
}

pub(crate) fn histogram(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let x = ctx.numeric(Role::X)?;
    let color = ctx.optional(Role::Color)?;

    let all = ctx.table.numeric_values(x);
    let (mean, median) = match (stats::mean(&all), stats::median(&all)) {
        (Some(mean), Some(median)) => (mean, median),
        _ => {
            return Err(ChartBuildError::Degenerate(format!(
                "{} has no values",
                ctx.name(x)
            )))
        }
    };

    let groups = series(ctx, &all_rows(ctx.table), color, ctx.name(x));
    let traces = groups
        .iter()
        .enumerate()
        .map(|(i, (name, members))| Trace {
            name: Some(name.clone()),
            x: ctx.numbers(members, x),
            bins: Some(HISTOGRAM_BINS),
            aggregation: Some(Aggregation::Count),
            color: Some(ctx.theme.color(i)),
            ..Trace::new(TraceKind::Histogram)
        })
        .collect();

    let mut layout = ctx.layout(format!("Distribution of {}", ctx.name(x)));
    layout.x_axis = Axis::titled(ctx.axis_title(x));
    layout.y_axis = Axis::titled("Frequency");
    layout.reference_lines = vec![
        ReferenceLine {
            value: mean,
            label: format!("Mean: {:.2}", mean),
            color: "red".to_string(),
            dash: Dash::Dash,
        },
        ReferenceLine {
            value: median,
            label: format!("Median: {:.2}", median),
            color: "blue".to_string(),
            dash: Dash::Dot,
        },
    ];

    Ok(ctx.spec(traces, layout))
}

pub(crate) fn box_plot(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let x = ctx.numeric(Role::X)?;
    let color = ctx.optional(Role::Color)?;
    let rows = all_rows(ctx.table);

    let (traces, title, category_axis) = match color {
        Some(c) => {
            let traces = series(ctx, &rows, Some(c), ctx.name(x))
                .iter()
                .enumerate()
                .map(|(i, (name, members))| Trace {
                    name: Some(name.clone()),
                    y: ctx.numbers(members, x),
                    color: Some(ctx.theme.color(i)),
                    ..Trace::new(TraceKind::Box)
                })
                .collect();
            let title = format!("Distribution of {} by {}", ctx.name(x), ctx.name(c));
            (traces, title, Axis::titled(ctx.axis_title(c)))
        }
        None => {
            let trace = Trace {
                name: Some(ctx.name(x).to_string()),
                y: ctx.numbers(&rows, x),
                color: Some(ctx.theme.color(0)),
                ..Trace::new(TraceKind::Box)
            };
            (vec![trace], format!("Distribution of {}", ctx.name(x)), Axis::default())
        }
    };

    let mut layout = ctx.layout(title);
    layout.x_axis = category_axis;
    layout.y_axis = Axis::titled(ctx.axis_title(x));

    Ok(ctx.spec(traces, layout))
}

pub(crate) fn heatmap(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let numeric = ctx.table.numeric_columns();
    if numeric.is_empty() {
        return Err(ChartBuildError::NoNumericColumns);
    }

    let z = numeric
        .iter()
        .map(|&a| {
            numeric
                .iter()
                .map(|&b| stats::pearson(ctx.table, a, b))
                .collect()
        })
        .collect();
    let names: Vec<Value> = numeric.iter().map(|&i| Value::from(ctx.name(i))).collect();

    let trace = Trace {
        x: names.clone(),
        y: names,
        z,
        color_scale: Some("RdBu".to_string()),
        ..Trace::new(TraceKind::Heatmap)
    };

    let mut layout = ctx.layout("Correlation Heatmap".to_string());
    layout.x_axis = Axis::titled("Variables");
    layout.y_axis = Axis::titled("Variables");

    Ok(ctx.spec(vec![trace], layout))
}

pub(crate) fn area(ctx: &Context<'_>) -> Result<ChartSpec, ChartBuildError> {
    let x = ctx.required(Role::X)?;
    let y = ctx.required(Role::Y)?;
    let color = ctx.optional(Role::Color)?;

    let grouped = color.is_some();
    let groups = series(ctx, &ctx.table.sorted_indices(x), color, ctx.name(y));
    let traces = xy_traces(ctx, TraceKind::Area, &groups, x, y)
        .into_iter()
        .map(|t| Trace {
            mode: Some(Mode::Lines),
            fill: Some(if grouped { Fill::ToNextY } else { Fill::ToZeroY }),
            stacked: grouped,
            ..t
        })
        .collect();

    let mut layout = ctx.layout(format!("{} Area over {}", ctx.name(y), ctx.name(x)));
    layout.x_axis = Axis::titled(ctx.axis_title(x));
    layout.y_axis = Axis::titled(ctx.axis_title(y));

    Ok(ctx.spec(traces, layout))
}
