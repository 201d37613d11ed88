use sqlreport::chart::plotly::to_plotly;
use sqlreport::chart::{
    create_chart, dashboard, Aggregation, BarMode, ChartBuildError, ChartTheme, ChartType, Fill,
    Mode, Role, RoleBindings, TraceKind,
};
use sqlreport::table::{ResultTable, Value};

fn table(names: &[&str], rows: Vec<Vec<Value>>) -> ResultTable {
    ResultTable::new(names.iter().map(|n| n.to_string()).collect(), rows).unwrap()
}

fn zones() -> ResultTable {
    table(
        &["zone", "usage"],
        vec![
            vec!["A".into(), 10_i64.into()],
            vec!["B".into(), 3_i64.into()],
            vec!["A".into(), 5_i64.into()],
        ],
    )
}

fn build(table: &ResultTable, chart_type: ChartType, bindings: RoleBindings) -> Result<sqlreport::chart::ChartSpec, ChartBuildError> {
    create_chart(table, chart_type, &bindings, &ChartTheme::default())
}

#[test]
fn test_pie_sums_per_label() {
    let spec = build(&zones(), ChartType::Pie, RoleBindings::new().label("zone").value("usage")).unwrap();

    assert_eq!(spec.traces.len(), 1);
    let trace = &spec.traces[0];
    assert_eq!(trace.kind, TraceKind::Pie);
    assert_eq!(trace.labels, vec![Value::from("A"), Value::from("B")]);
    assert_eq!(trace.values, vec![15.0, 3.0]);
    assert_eq!(trace.aggregation, Some(Aggregation::Sum));
    assert_eq!(trace.text_info.as_deref(), Some("percent+label"));
    assert_eq!(spec.title(), "Distribution of usage by zone");
}

#[test]
fn test_treemap_shares_pie_aggregation() {
    let spec = build(&zones(), ChartType::Treemap, RoleBindings::new().label("zone").value("usage")).unwrap();
    assert_eq!(spec.traces[0].kind, TraceKind::Treemap);
    assert_eq!(spec.traces[0].values, vec![15.0, 3.0]);
    assert_eq!(spec.title(), "Treemap of usage by zone");
}

#[test]
fn test_scatter_trendline_fit() {
    let data = table(
        &["x", "y"],
        (1..=5).map(|i| vec![Value::Int(i), Value::Int(2 * i)]).collect(),
    );
    let spec = build(&data, ChartType::Scatter, RoleBindings::new().x("x").y("y")).unwrap();

    let trend = spec.trace_named("Trend").unwrap();
    let fit = trend.fit.unwrap();
    assert!((fit.slope - 2.0).abs() < 1e-9);
    assert!(fit.intercept.abs() < 1e-9);
    assert_eq!(trend.mode, Some(Mode::Lines));
    assert_eq!(trend.x.first(), Some(&Value::Float(1.0)));
    assert_eq!(trend.y.last(), Some(&Value::Float(10.0)));
    assert_eq!(spec.title(), "y vs x");
}

#[test]
fn test_scatter_constant_x_is_degenerate() {
    let data = table(
        &["x", "y"],
        vec![
            vec![1_i64.into(), 1_i64.into()],
            vec![1_i64.into(), 2_i64.into()],
        ],
    );
    let err = build(&data, ChartType::Scatter, RoleBindings::new().x("x").y("y")).unwrap_err();
    assert!(matches!(err, ChartBuildError::Degenerate(_)));
}

#[test]
fn test_histogram_reference_lines() {
    let data = table(
        &["v"],
        [1, 2, 3, 4, 10].iter().map(|&n| vec![Value::Int(n)]).collect(),
    );
    let spec = build(&data, ChartType::Histogram, RoleBindings::new().x("v")).unwrap();

    let lines = &spec.layout.reference_lines;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].value, 4.0);
    assert_eq!(lines[0].label, "Mean: 4.00");
    assert_eq!(lines[1].value, 3.0);
    assert_eq!(lines[1].label, "Median: 3.00");
    assert_eq!(spec.traces[0].bins, Some(30));
    assert_eq!(spec.layout.y_axis.title.as_deref(), Some("Frequency"));
}

#[test]
fn test_bar_with_color_stacks() {
    let data = table(
        &["zone", "usage", "tier"],
        vec![
            vec!["A".into(), 1_i64.into(), "res".into()],
            vec!["B".into(), 2_i64.into(), "com".into()],
            vec!["A".into(), 3_i64.into(), "com".into()],
        ],
    );
    let spec = build(
        &data,
        ChartType::Bar,
        RoleBindings::new().x("zone").y("usage").color("tier"),
    )
    .unwrap();

    let names: Vec<_> = spec.traces.iter().map(|t| t.name.as_deref()).collect();
    assert_eq!(names, vec![Some("res"), Some("com")]);
    assert_eq!(spec.layout.bar_mode, Some(BarMode::Stack));
    assert_eq!(spec.layout.x_axis.tick_angle, Some(0));
}

#[test]
fn test_bar_rotates_many_labels() {
    let data = table(
        &["day", "n"],
        (0..6).map(|i| vec![Value::from(format!("d{}", i)), Value::Int(i)]).collect(),
    );
    let spec = build(&data, ChartType::Bar, RoleBindings::new().x("day").y("n")).unwrap();
    assert_eq!(spec.layout.x_axis.tick_angle, Some(-45));
}

#[test]
fn test_area_grouped_fills_to_next() {
    let data = table(
        &["t", "v", "g"],
        vec![
            vec![2_i64.into(), 1_i64.into(), "a".into()],
            vec![1_i64.into(), 2_i64.into(), "b".into()],
        ],
    );
    let grouped = build(&data, ChartType::Area, RoleBindings::new().x("t").y("v").color("g")).unwrap();
    assert!(grouped.traces.iter().all(|t| t.fill == Some(Fill::ToNextY) && t.stacked));

    let single = build(&data, ChartType::Area, RoleBindings::new().x("t").y("v")).unwrap();
    assert_eq!(single.traces[0].fill, Some(Fill::ToZeroY));
    assert_eq!(single.traces[0].x, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_heatmap_correlation_diagonal() {
    let data = table(
        &["a", "b", "label"],
        vec![
            vec![1_i64.into(), 2_i64.into(), "x".into()],
            vec![2_i64.into(), 4_i64.into(), "y".into()],
            vec![3_i64.into(), 5_i64.into(), "z".into()],
        ],
    );
    let spec = build(&data, ChartType::Heatmap, RoleBindings::new()).unwrap();

    let trace = &spec.traces[0];
    assert_eq!(trace.x, vec![Value::from("a"), Value::from("b")]);
    assert_eq!(trace.z.len(), 2);
    assert!((trace.z[0][0].unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(trace.z[0][1], trace.z[1][0]);
}

#[test]
fn test_heatmap_without_numbers() {
    let data = table(&["name"], vec![vec!["x".into()]]);
    assert_eq!(
        build(&data, ChartType::Heatmap, RoleBindings::new()),
        Err(ChartBuildError::NoNumericColumns)
    );
}

#[test]
fn test_errors() {
    let empty = ResultTable::empty(vec!["zone".into()]);
    assert_eq!(
        build(&empty, ChartType::Bar, RoleBindings::new().x("zone").y("zone")),
        Err(ChartBuildError::EmptyTable)
    );

    assert_eq!(
        build(&zones(), ChartType::Bar, RoleBindings::new().x("zone")),
        Err(ChartBuildError::MissingRole {
            chart_type: ChartType::Bar,
            role: Role::Y
        })
    );

    assert_eq!(
        build(&zones(), ChartType::Bar, RoleBindings::new().x("zone").y("volume")),
        Err(ChartBuildError::UnknownColumn("volume".into()))
    );

    assert_eq!(
        build(&zones(), ChartType::Histogram, RoleBindings::new().x("zone")),
        Err(ChartBuildError::NotNumeric {
            column: "zone".into(),
            role: Role::X
        })
    );
}

#[test]
fn test_blank_binding_counts_as_missing() {
    let err = build(&zones(), ChartType::Pie, RoleBindings::new().label(" ").value("usage")).unwrap_err();
    assert!(matches!(err, ChartBuildError::MissingRole { role: Role::Label, .. }));
}

#[test]
fn test_plotly_figure_for_line() {
    let data = table(
        &["t", "v"],
        vec![vec![1_i64.into(), 5_i64.into()], vec![2_i64.into(), 7_i64.into()]],
    );
    let spec = build(&data, ChartType::Line, RoleBindings::new().x("t").y("v")).unwrap();
    let figure = to_plotly(&spec);

    assert_eq!(figure["data"][0]["type"], "scatter");
    assert_eq!(figure["data"][0]["mode"], "lines+markers");
    assert_eq!(figure["layout"]["title"]["text"], "v Trend over t");
}

#[test]
fn test_dashboard_grid() {
    let charts: Vec<_> = [ChartType::Bar, ChartType::Pie, ChartType::Histogram]
        .into_iter()
        .map(|chart_type| {
            let bindings = match chart_type {
                ChartType::Pie => RoleBindings::new().label("zone").value("usage"),
                ChartType::Histogram => RoleBindings::new().x("usage"),
                _ => RoleBindings::new().x("zone").y("usage"),
            };
            build(&zones(), chart_type, bindings).unwrap()
        })
        .collect();

    let board = dashboard(charts).unwrap();
    assert_eq!((board.rows, board.cols), (2, 2));
    assert_eq!(board.height, 600);
    assert_eq!(board.panels[2].row, 1);
    assert_eq!(board.panels[2].col, 0);
    assert!(dashboard(Vec::new()).is_none());
}

#[test]
fn test_pie_merges_int_and_float_labels() {
    let data = table(
        &["tier", "usage"],
        vec![
            vec![Value::Int(1), 10_i64.into()],
            vec![Value::Float(1.0), 5_i64.into()],
            vec![Value::Int(2), 3_i64.into()],
        ],
    );
    let spec = build(&data, ChartType::Pie, RoleBindings::new().label("tier").value("usage")).unwrap();

    assert_eq!(spec.traces[0].labels, vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(spec.traces[0].values, vec![15.0, 3.0]);
}

#[test]
fn test_bar_with_many_color_groups() {
    let rows: Vec<Vec<Value>> = (0..20_000_i64)
        .map(|i| vec![Value::from(format!("m{}", i % 7)), Value::Int(i), Value::Int(19_999 - i)])
        .collect();
    let data = table(&["zone", "usage", "meter"], rows);

    let spec = build(&data, ChartType::Bar, RoleBindings::new().x("zone").y("usage").color("meter")).unwrap();

    assert_eq!(spec.traces.len(), 20_000);
    assert_eq!(spec.traces[0].name.as_deref(), Some("19999"));
    assert_eq!(spec.traces[19_999].name.as_deref(), Some("0"));
    assert!(spec.traces.iter().all(|t| t.x.len() == 1));
}

#[test]
fn test_every_chart_type_shares_theme() {
    let data = table(
        &["zone", "usage", "pressure"],
        vec![
            vec!["A".into(), 10_i64.into(), 1.5.into()],
            vec!["B".into(), 3_i64.into(), 2.0.into()],
            vec!["A".into(), 5_i64.into(), 2.5.into()],
            vec!["C".into(), 8_i64.into(), 3.5.into()],
        ],
    );

    let figures: Vec<_> = ChartType::ALL
        .into_iter()
        .map(|chart_type| {
            let bindings = match chart_type {
                ChartType::Bar => RoleBindings::new().x("zone").y("usage"),
                ChartType::Line | ChartType::Scatter | ChartType::Area => {
                    RoleBindings::new().x("pressure").y("usage")
                }
                ChartType::Pie | ChartType::Treemap => RoleBindings::new().label("zone").value("usage"),
                ChartType::Histogram => RoleBindings::new().x("usage"),
                ChartType::Box => RoleBindings::new().x("usage").color("zone"),
                ChartType::Heatmap => RoleBindings::new(),
            };
            let spec = build(&data, chart_type, bindings).unwrap();
            assert_eq!(spec.layout.theme, ChartTheme::default(), "{:?}", chart_type);
            to_plotly(&spec)
        })
        .collect();

    let first = &figures[0]["layout"];
    for figure in &figures[1..] {
        let layout = &figure["layout"];
        for key in ["font", "paper_bgcolor", "plot_bgcolor", "height", "margin"] {
            assert_eq!(layout[key], first[key], "{}", key);
        }
        assert_eq!(layout["xaxis"]["gridcolor"], first["xaxis"]["gridcolor"]);
        assert_eq!(layout["yaxis"]["gridcolor"], first["yaxis"]["gridcolor"]);
        assert_eq!(layout["height"], 500);
    }
}
