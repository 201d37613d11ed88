//! Plotly figure JSON from chart specs.
//!
//! This is the only module that knows Plotly's attribute names. The output
//! is the `{ "data": [...], "layout": {...} }` object `Plotly.newPlot`
//! accepts.

use serde_json::{json, Map, Value as Json};

use super::dashboard::Dashboard;
use super::spec::{
    Axis, BarMode, ChartSpec, Dash, Fill, Layout, Mode, Trace, TraceKind,
};
use super::theme::ChartTheme;

/// Largest bubble diameter in pixels.
const MAX_BUBBLE_PX: f64 = 40.0;

fn dash_name(dash: Dash) -> &'static str {
    match dash {
        Dash::Solid => "solid",
        Dash::Dash => "dash",
        Dash::Dot => "dot",
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Markers => "markers",
        Mode::Lines => "lines",
        Mode::LinesMarkers => "lines+markers",
    }
}

// =============================================================================
// Traces
// =============================================================================

fn trace_json(trace: &Trace) -> Json {
    let mut out = Map::new();

    let plotly_type = match trace.kind {
        TraceKind::Bar => "bar",
        TraceKind::Line | TraceKind::Scatter | TraceKind::Area => "scatter",
        TraceKind::Pie => "pie",
        TraceKind::Histogram => "histogram",
        TraceKind::Box => "box",
        TraceKind::Heatmap => "heatmap",
        TraceKind::Treemap => "treemap",
    };
    out.insert("type".into(), json!(plotly_type));

    if let Some(name) = &trace.name {
        out.insert("name".into(), json!(name));
    }
    if !trace.x.is_empty() {
        out.insert("x".into(), json!(trace.x));
    }
    if !trace.y.is_empty() {
        out.insert("y".into(), json!(trace.y));
    }
    if let Some(mode) = trace.mode {
        out.insert("mode".into(), json!(mode_name(mode)));
    }

    let mut marker = Map::new();
    if let Some(color) = &trace.color {
        marker.insert("color".into(), json!(color));
    }
    if let Some(size) = trace.marker_size {
        marker.insert("size".into(), json!(size));
    }
    if !trace.sizes.is_empty() {
        let largest = trace.sizes.iter().flatten().copied().fold(0.0_f64, f64::max);
        marker.insert("size".into(), json!(trace.sizes));
        marker.insert("sizemode".into(), json!("area"));
        if largest > 0.0 {
            marker.insert(
                "sizeref".into(),
                json!(2.0 * largest / (MAX_BUBBLE_PX * MAX_BUBBLE_PX)),
            );
        }
    }
    if !trace.colors.is_empty() {
        marker.insert("colors".into(), json!(trace.colors));
    }

    match trace.kind {
        TraceKind::Pie => {
            out.insert("labels".into(), json!(trace.labels));
            out.insert("values".into(), json!(trace.values));
            out.insert("textposition".into(), json!("inside"));
            if let Some(info) = &trace.text_info {
                out.insert("textinfo".into(), json!(info));
            }
            out.insert(
                "hovertemplate".into(),
                json!("<b>%{label}</b><br>Value: %{value}<br>Percentage: %{percent}<extra></extra>"),
            );
        }
        TraceKind::Treemap => {
            out.insert("labels".into(), json!(trace.labels));
            out.insert("parents".into(), json!(vec![""; trace.labels.len()]));
            out.insert("values".into(), json!(trace.values));
        }
        TraceKind::Histogram => {
            if let Some(bins) = trace.bins {
                out.insert("nbinsx".into(), json!(bins));
            }
        }
        TraceKind::Heatmap => {
            out.insert("z".into(), json!(trace.z));
            if let Some(scale) = &trace.color_scale {
                out.insert("colorscale".into(), json!(scale));
            }
            out.insert("zmin".into(), json!(-1));
            out.insert("zmax".into(), json!(1));
        }
        TraceKind::Area => {
            if trace.stacked {
                out.insert("stackgroup".into(), json!("one"));
            }
            if let Some(color) = &trace.color {
                out.insert("line".into(), json!({ "color": color }));
            }
        }
        _ => {}
    }

    if let Some(fill) = trace.fill {
        let name = match fill {
            Fill::ToZeroY => "tozeroy",
            Fill::ToNextY => "tonexty",
        };
        out.insert("fill".into(), json!(name));
    }

    if let Some(line) = &trace.line {
        let mut style = Map::new();
        if let Some(color) = &line.color {
            style.insert("color".into(), json!(color));
        }
        style.insert("dash".into(), json!(dash_name(line.dash)));
        style.insert("width".into(), json!(line.width));
        out.insert("line".into(), Json::Object(style));
    }

    if !marker.is_empty() {
        out.insert("marker".into(), Json::Object(marker));
    }

    Json::Object(out)
}

// =============================================================================
// Layout
// =============================================================================

fn axis_json(axis: &Axis, theme: &ChartTheme) -> Json {
    let mut out = Map::new();
    if let Some(title) = &axis.title {
        out.insert("title".into(), json!({ "text": title }));
    }
    if let Some(angle) = axis.tick_angle {
        out.insert("tickangle".into(), json!(angle));
    }
    out.insert("gridcolor".into(), json!(theme.grid_color));
    out.insert("linecolor".into(), json!(theme.line_color));
    Json::Object(out)
}

fn themed_layout(title: &str, theme: &ChartTheme) -> Map<String, Json> {
    let mut out = Map::new();
    out.insert(
        "title".into(),
        json!({
            "text": title,
            "font": { "size": theme.title_font_size, "color": theme.title_font_color },
        }),
    );
    out.insert(
        "font".into(),
        json!({
            "family": theme.font_family,
            "size": theme.font_size,
            "color": theme.font_color,
        }),
    );
    out.insert("paper_bgcolor".into(), json!(theme.paper_background));
    out.insert("plot_bgcolor".into(), json!(theme.plot_background));
    out.insert("height".into(), json!(theme.height));
    out.insert(
        "margin".into(),
        json!({
            "l": theme.margin.left,
            "r": theme.margin.right,
            "t": theme.margin.top,
            "b": theme.margin.bottom,
        }),
    );
    out.insert("showlegend".into(), json!(theme.show_legend));
    out
}

fn layout_json(layout: &Layout) -> Json {
    let theme = &layout.theme;
    let mut out = themed_layout(&layout.title, theme);

    out.insert("xaxis".into(), axis_json(&layout.x_axis, theme));
    out.insert("yaxis".into(), axis_json(&layout.y_axis, theme));

    if let Some(mode) = layout.bar_mode {
        let name = match mode {
            BarMode::Group => "group",
            BarMode::Stack => "stack",
        };
        out.insert("barmode".into(), json!(name));
    }

    if !layout.reference_lines.is_empty() {
        let shapes: Vec<Json> = layout
            .reference_lines
            .iter()
            .map(|line| {
                json!({
                    "type": "line",
                    "xref": "x",
                    "yref": "paper",
                    "x0": line.value,
                    "x1": line.value,
                    "y0": 0,
                    "y1": 1,
                    "line": { "color": line.color, "dash": dash_name(line.dash) },
                })
            })
            .collect();
        let annotations: Vec<Json> = layout
            .reference_lines
            .iter()
            .map(|line| {
                json!({
                    "x": line.value,
                    "xref": "x",
                    "y": 1,
                    "yref": "paper",
                    "text": line.label,
                    "showarrow": false,
                    "xanchor": "left",
                })
            })
            .collect();
        out.insert("shapes".into(), json!(shapes));
        out.insert("annotations".into(), json!(annotations));
    }

    Json::Object(out)
}

/// Plotly figure for one chart.
pub fn to_plotly(spec: &ChartSpec) -> Json {
    json!({
        "data": spec.traces.iter().map(trace_json).collect::<Vec<_>>(),
        "layout": layout_json(&spec.layout),
    })
}

/// Plotly figure for a dashboard, using Plotly's independent subplot grid.
pub fn dashboard_to_plotly(dashboard: &Dashboard, theme: &ChartTheme) -> Json {
    let mut data = Vec::new();
    let mut annotations = Vec::new();

    for (i, panel) in dashboard.panels.iter().enumerate() {
        let axis_suffix = if i == 0 { String::new() } else { (i + 1).to_string() };

        for trace in &panel.chart.traces {
            let mut json = trace_json(trace);
            if let Json::Object(map) = &mut json {
                match trace.kind {
                    // Domain-based traces are placed by grid cell, not by axes
                    TraceKind::Pie | TraceKind::Treemap => {
                        map.insert(
                            "domain".into(),
                            json!({ "row": panel.row, "column": panel.col }),
                        );
                    }
                    _ => {
                        map.insert("xaxis".into(), json!(format!("x{}", axis_suffix)));
                        map.insert("yaxis".into(), json!(format!("y{}", axis_suffix)));
                    }
                }
            }
            data.push(json);
        }

        let x = (panel.col as f64 + 0.5) / dashboard.cols as f64;
        let y = 1.0 - panel.row as f64 / dashboard.rows as f64;
        annotations.push(json!({
            "text": panel.title,
            "x": x,
            "y": y,
            "xref": "paper",
            "yref": "paper",
            "xanchor": "center",
            "yanchor": "bottom",
            "showarrow": false,
        }));
    }

    let mut layout = themed_layout(&dashboard.title, theme);
    layout.insert("height".into(), json!(dashboard.height));
    layout.insert("showlegend".into(), json!(dashboard.show_legend));
    layout.insert(
        "grid".into(),
        json!({
            "rows": dashboard.rows,
            "columns": dashboard.cols,
            "pattern": "independent",
            "xgap": 0.1,
            "ygap": 0.1,
        }),
    );
    layout.insert("annotations".into(), json!(annotations));

    json!({ "data": data, "layout": Json::Object(layout) })
}
