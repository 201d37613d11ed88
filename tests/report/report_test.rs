use chrono::{NaiveDate, NaiveDateTime};
use sqlreport::report::{
    completeness, insights, recommendations, ReportConfig, ReportGenerator, ReportType,
    SectionKind, SectionPayload, StatBlock,
};
use sqlreport::table::{ResultTable, Value};

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(14, 30, 0))
        .unwrap()
}

fn day(d: u32) -> Value {
    Value::DateTime(
        NaiveDate::from_ymd_opt(2024, 1, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap(),
    )
}

/// Three rows, one missing pressure reading.
fn readings() -> ResultTable {
    ResultTable::new(
        vec!["zone".into(), "usage".into(), "pressure".into()],
        vec![
            vec!["A".into(), 10_i64.into(), 1.5.into()],
            vec!["B".into(), 4_i64.into(), Value::Null],
            vec!["A".into(), 7_i64.into(), 2.5.into()],
        ],
    )
    .unwrap()
}

fn generate(table: &ResultTable, report_type: &str) -> sqlreport::report::Report {
    ReportGenerator::default().generate_at(table, "Water Usage", report_type, true, true, at())
}

fn titles(report: &sqlreport::report::Report) -> Vec<&str> {
    report.sections.iter().map(|s| s.title.as_str()).collect()
}

#[test]
fn test_report_type_names() {
    assert_eq!(ReportType::from_name("Executive Summary"), ReportType::ExecutiveSummary);
    assert_eq!(ReportType::from_name("trend_report"), ReportType::TrendReport);
    assert_eq!(ReportType::from_name("  Detailed Analysis "), ReportType::DetailedAnalysis);
    assert_eq!(ReportType::from_name("quarterly"), ReportType::DetailedAnalysis);
}

#[test]
fn test_unknown_type_falls_back_to_detailed() {
    let report = generate(&readings(), "Board Pack");
    assert_eq!(report.report_type, Some(ReportType::DetailedAnalysis));
    assert_eq!(report.subtitle, "Detailed Analysis Report");
}

#[test]
fn test_executive_sections() {
    let report = generate(&readings(), "Executive Summary");

    assert!(!report.is_error());
    assert_eq!(
        titles(&report),
        vec!["Key Metrics", "Key Insights", "Visual Analysis", "Data Summary", "Recommendations"]
    );
    assert_eq!(report.meta[0].value, "March 05, 2024 at 02:30 PM");
    assert_eq!(report.meta[1].value, "3 records");
    assert_eq!(report.footer[1], "© 2024 - Confidential Business Intelligence Report");

    let SectionPayload::Metrics(cards) = &report.sections[0].payload else {
        panic!("expected metric cards");
    };
    let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["3", "2", "4.50", "88.9%"]);
}

#[test]
fn test_executive_without_charts() {
    let report = ReportGenerator::default().generate_at(
        &readings(),
        "Water Usage",
        "executive summary",
        false,
        true,
        at(),
    );
    assert!(report.section("Visual Analysis").is_none());
    assert_eq!(report.charts().count(), 0);
}

#[test]
fn test_insight_lines() {
    assert_eq!(
        insights(&readings()),
        vec![
            "Dataset contains 3 records across 3 columns",
            "usage: Average 7.00, Range 4.00 to 10.00",
            "pressure: Average 2.00, Range 1.50 to 2.50",
            "zone: 2 unique values, most common: 'A'",
            "Missing data found in 1 columns",
        ]
    );
}

#[test]
fn test_empty_table_reports() {
    let empty = ResultTable::empty(vec!["zone".into(), "usage".into()]);
    assert_eq!(insights(&empty), vec!["No data available for analysis."]);
    assert!(recommendations(&empty, 10_000).is_empty());

    for report_type in ["executive summary", "detailed analysis", "trend report"] {
        let report = generate(&empty, report_type);
        assert!(!report.is_error(), "{} failed", report_type);

        let insights = report.section_of_kind(SectionKind::Insights).unwrap();
        let SectionPayload::Insights(found) = &insights.payload else {
            panic!("expected insights payload");
        };
        assert!(found.lines.iter().any(|l| l == "No data available for analysis."));
        assert_eq!(report.charts().count(), 0);
    }
}

#[test]
fn test_completeness_rounding() {
    let table = readings();
    assert!((completeness(&table) - 800.0 / 9.0).abs() < 1e-9);

    let report = generate(&table, "detailed analysis");
    let SectionPayload::QualityAssessment(quality) =
        &report.section("Data Quality Assessment").unwrap().payload
    else {
        panic!("expected quality payload");
    };
    assert_eq!(quality.completeness, 88.9);
    assert_eq!(quality.missing_cells, 1);
    assert_eq!(quality.total_cells, 9);
    assert_eq!(quality.columns[0].column, "pressure");
    assert_eq!(quality.columns[0].percent, 33.33);
}

#[test]
fn test_detailed_sections() {
    let report = generate(&readings(), "Detailed Analysis");
    assert_eq!(
        titles(&report),
        vec![
            "Dataset Overview",
            "Detailed Statistics",
            "Complete Data View",
            "Comprehensive Visual Analysis",
            "Data Quality Assessment",
        ]
    );
    assert_eq!(report.meta[1].value, "3 rows × 3 columns");

    let SectionPayload::Statistics(blocks) = &report.section("Detailed Statistics").unwrap().payload
    else {
        panic!("expected statistics payload");
    };
    let headings: Vec<&str> = blocks
        .iter()
        .filter_map(|b| match b {
            StatBlock::Table { heading, .. } => Some(heading.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(headings, vec!["Numeric Columns Analysis", "Categorical Columns Analysis"]);
}

#[test]
fn test_detailed_preview_limit() {
    let rows: Vec<Vec<Value>> = (0..60).map(|i| vec![Value::Int(i)]).collect();
    let table = ResultTable::new(vec!["n".into()], rows).unwrap();

    let config = ReportConfig {
        detailed_preview_rows: 25,
        ..ReportConfig::default()
    };
    let report = ReportGenerator::new(config).generate_at(&table, "Big", "detailed", false, false, at());

    let SectionPayload::DataPreview(preview) = &report.section("Complete Data View").unwrap().payload
    else {
        panic!("expected preview payload");
    };
    assert_eq!(preview.table.row_count(), 25);
    assert_eq!(preview.total_rows, 60);
    assert!(preview.is_truncated());
}

#[test]
fn test_trend_report_with_dates() {
    let table = ResultTable::new(
        vec!["read_at".into(), "usage".into()],
        vec![
            vec![day(3), 5_i64.into()],
            vec![day(1), 2_i64.into()],
            vec![day(11), 9_i64.into()],
        ],
    )
    .unwrap();
    let report = generate(&table, "Trend Report");

    assert_eq!(report.meta[1].value, "2024-01-01 to 2024-01-11");
    let SectionPayload::Insights(analysis) = &report.section("Trend Analysis").unwrap().payload else {
        panic!("expected insights payload");
    };
    assert_eq!(analysis.heading.as_deref(), Some("Temporal Analysis Results"));
    assert_eq!(analysis.lines[2], "Time span: 10 days");
}

#[test]
fn test_large_dataset_recommendation() {
    let rows: Vec<Vec<Value>> = (0..11).map(|i| vec![Value::Int(i)]).collect();
    let table = ResultTable::new(vec!["n".into()], rows).unwrap();

    let titles: Vec<String> = recommendations(&table, 10).into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Performance Optimization"]);
}
