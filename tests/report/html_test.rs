use chrono::{NaiveDate, NaiveDateTime};
use sqlreport::chart::{create_chart, dashboard, ChartTheme, ChartType, RoleBindings};
use sqlreport::report::{dashboard_html, escape_html, Report, ReportGenerator};
use sqlreport::table::{ResultTable, Value};

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap()
}

fn readings() -> ResultTable {
    ResultTable::new(
        vec!["zone".into(), "usage".into()],
        vec![
            vec!["<North>".into(), 10_i64.into()],
            vec!["South & East".into(), 4_i64.into()],
            vec!["<North>".into(), 7_i64.into()],
        ],
    )
    .unwrap()
}

#[test]
fn test_rendering_is_deterministic() {
    let generator = ReportGenerator::default();
    let first = generator.generate_at(&readings(), "Usage", "detailed analysis", true, true, at());
    let second = generator.generate_at(&readings(), "Usage", "detailed analysis", true, true, at());

    assert_eq!(first, second);
    assert_eq!(first.to_html(), second.to_html());
}

#[test]
fn test_cells_and_title_are_escaped() {
    let report = ReportGenerator::default().generate_at(
        &readings(),
        "Q1 <Usage> & \"Costs\"",
        "executive summary",
        false,
        true,
        at(),
    );
    let html = report.to_html();

    assert!(html.contains("<h1>Q1 &lt;Usage&gt; &amp; &quot;Costs&quot;</h1>"));
    assert!(html.contains("<td>&lt;North&gt;</td>"));
    assert!(html.contains("<td>South &amp; East</td>"));
    assert!(!html.contains("<North>"));
}

#[test]
fn test_plotly_only_with_charts() {
    let generator = ReportGenerator::default();

    let with_charts = generator
        .generate_at(&readings(), "Usage", "executive summary", true, true, at())
        .to_html();
    assert!(with_charts.contains("cdn.plot.ly"));
    assert!(with_charts.contains("<div id=\"chart1\"></div>"));
    assert!(with_charts.contains("Plotly.newPlot(\"chart1\""));

    let without = generator
        .generate_at(&readings(), "Usage", "executive summary", false, true, at())
        .to_html();
    assert!(!without.contains("cdn.plot.ly"));
    assert!(!without.contains("Plotly.newPlot"));
}

#[test]
fn test_chart_ids_are_sequential_across_sections() {
    let html = ReportGenerator::default()
        .generate_at(&readings(), "Usage", "detailed analysis", true, true, at())
        .to_html();

    assert!(html.contains("id=\"chart1\""));
    assert!(html.contains("id=\"chart2\""));
    assert!(!html.contains("id=\"chart0\""));
}

#[test]
fn test_empty_table_html() {
    let empty = ResultTable::empty(vec!["zone".into()]);
    let html = ReportGenerator::default()
        .generate_at(&empty, "Nothing", "executive summary", true, true, at())
        .to_html();

    assert!(html.contains("<p>• No data available for analysis.</p>"));
    assert!(html.contains("No data to display."));
    assert!(html.contains("No recommendations available for empty dataset."));
}

#[test]
fn test_error_page() {
    let html = Report::error("boom <here>", at()).to_html();
    assert!(html.contains("Report Generation Error"));
    assert!(html.contains("boom &lt;here&gt;"));
    assert!(!html.contains("<div class=\"meta-info\">"));
}

#[test]
fn test_escape_html_quotes() {
    assert_eq!(escape_html("it's \"x\""), "it&#x27;s &quot;x&quot;");
}

#[test]
fn test_dashboard_page() {
    let table = readings();
    let theme = ChartTheme::default();
    let charts = vec![
        create_chart(&table, ChartType::Bar, &RoleBindings::new().x("zone").y("usage"), &theme).unwrap(),
        create_chart(&table, ChartType::Histogram, &RoleBindings::new().x("usage"), &theme).unwrap(),
    ];
    let board = dashboard(charts).unwrap();
    let html = dashboard_html(&board, &theme);

    assert!(html.contains("<title>Dashboard Overview</title>"));
    assert!(html.contains("Plotly.newPlot(\"dashboard\""));
    assert!(html.contains("\"xaxis\":\"x2\""));
}

#[test]
fn test_large_count_note() {
    let rows: Vec<Vec<Value>> = (0..1_200).map(|i| vec![Value::Int(i)]).collect();
    let table = ResultTable::new(vec!["n".into()], rows).unwrap();
    let html = ReportGenerator::default()
        .generate_at(&table, "Big", "executive summary", false, false, at())
        .to_html();

    assert!(html.contains("Showing first 10 of 1,200 total records"));
}
