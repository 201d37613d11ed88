use chrono::NaiveDate;
use sqlreport::chart::{create_chart, recommend, ChartTheme, ChartType, RoleBindings};
use sqlreport::table::{ResultTable, Value};

fn day(d: u32) -> Value {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Value::DateTime)
        .unwrap()
}

fn readings() -> ResultTable {
    ResultTable::new(
        vec![
            "read_at".into(),
            "zone".into(),
            "usage".into(),
            "pressure".into(),
        ],
        vec![
            vec![day(1), "A".into(), 10_i64.into(), 1.5.into()],
            vec![day(2), "B".into(), 4_i64.into(), 2.5.into()],
            vec![day(3), "A".into(), 7_i64.into(), 2.0.into()],
        ],
    )
    .unwrap()
}

#[test]
fn test_rule_order() {
    let types: Vec<ChartType> = recommend(&readings()).iter().map(|r| r.chart_type).collect();
    assert_eq!(
        types,
        vec![
            ChartType::Line,
            ChartType::Bar,
            ChartType::Pie,
            ChartType::Scatter,
            ChartType::Heatmap,
            ChartType::Histogram,
            ChartType::Box,
        ]
    );
}

#[test]
fn test_bindings_use_first_columns_of_each_type() {
    let recs = recommend(&readings());

    assert_eq!(recs[0].bindings, RoleBindings::new().x("read_at").y("usage"));
    assert_eq!(recs[0].reason, "Ideal for showing trends over time");
    assert_eq!(recs[2].bindings, RoleBindings::new().label("zone").value("usage"));
    assert_eq!(recs[3].bindings, RoleBindings::new().x("usage").y("pressure"));
}

#[test]
fn test_every_recommendation_builds() {
    let table = readings();
    for rec in recommend(&table) {
        let spec = create_chart(&table, rec.chart_type, &rec.bindings, &ChartTheme::default());
        assert!(spec.is_ok(), "{} failed: {:?}", rec.chart_type, spec.err());
    }
}

#[test]
fn test_empty_table_has_no_suggestions() {
    let table = ResultTable::empty(vec!["zone".into(), "usage".into()]);
    assert!(recommend(&table).is_empty());
}
