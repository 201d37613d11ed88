//! End-to-end: selection -> SQL -> SQLite -> chart and report.

use sqlreport::builder::{build_for_dialect, Aggregate, Filter, FilterOp, QueryBuilder, Selection};
use sqlreport::chart::{create_chart, recommend, ChartTheme, ChartType, RoleBindings};
use sqlreport::executor::{QueryExecutor, SchemaProvider, SqliteExecutor};
use sqlreport::report::{ReportGenerator, SectionKind};
use sqlreport::sql::Dialect;
use sqlreport::table::{ColumnType, Value};

const SEED: &str = "
CREATE TABLE meters (
    id INTEGER PRIMARY KEY,
    serial TEXT NOT NULL,
    zone TEXT NOT NULL
);
CREATE TABLE readings (
    reading_id INTEGER PRIMARY KEY,
    meter_id INTEGER REFERENCES meters(id),
    read_at DATETIME,
    usage_gallons REAL
);
INSERT INTO meters VALUES (1, 'M-001', 'North'), (2, 'M-002', 'South'), (3, 'M-003', 'North');
INSERT INTO readings VALUES
    (1, 1, '2024-01-01 08:00:00', 120.0),
    (2, 2, '2024-01-02 08:00:00', 80.0),
    (3, 3, '2024-01-03 08:00:00', 40.0),
    (4, 1, '2024-01-04 08:00:00', NULL);
";

fn seeded() -> SqliteExecutor {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute_batch(SEED).unwrap();
    exec
}

fn usage_by_zone() -> Selection {
    Selection::new()
        .table("readings")
        .table("meters")
        .column("meters.zone")
        .column("readings.usage_gallons")
        .group_by("meters.zone")
        .aggregate("readings.usage_gallons", Aggregate::Sum)
        .order_by("readings.usage_gallons")
}

#[test]
fn test_schema_and_relationships() {
    let exec = seeded();

    let schema = exec.schema().unwrap();
    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["meters", "readings"]);
    assert_eq!(schema["readings"].row_count, 4);
    assert!(schema["meters"].columns[0].is_primary_key);
    assert!(!schema["meters"].columns[1].nullable);

    let relationships = exec.relationships().unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].from_table, "readings");
    assert_eq!(relationships[0].to_column, "id");
}

#[test]
fn test_build_execute_chart() {
    let exec = seeded();
    let sql = QueryBuilder::new()
        .with_dialect(Dialect::Sqlite)
        .with_relationships(exec.relationships().unwrap())
        .build(&usage_by_zone())
        .unwrap();
    assert!(sql.contains("\"readings\".\"meter_id\" = \"meters\".\"id\""));

    let table = exec.execute(&sql).unwrap();
    assert_eq!(table.column_names(), vec!["zone", "sum_usage_gallons"]);
    assert_eq!(
        table.rows(),
        &[
            vec![Value::from("North"), Value::Float(160.0)],
            vec![Value::from("South"), Value::Float(80.0)],
        ]
    );

    let pie = create_chart(
        &table,
        ChartType::Pie,
        &RoleBindings::new().label("zone").value("sum_usage_gallons"),
        &ChartTheme::default(),
    )
    .unwrap();
    assert_eq!(pie.traces[0].values, vec![160.0, 80.0]);
}

#[test]
fn test_filtered_query() {
    let exec = seeded();
    let selection = Selection::new()
        .table("readings")
        .column("readings.read_at")
        .column("readings.usage_gallons")
        .filter(Filter::new("readings.usage_gallons", FilterOp::Gte, 80_i64))
        .order_by("readings.read_at");

    let table = exec
        .execute(&build_for_dialect(&selection, Dialect::Sqlite).unwrap())
        .unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_type(0), ColumnType::DateTime);
    assert_eq!(table.column_type(1), ColumnType::Numeric);
}

#[test]
fn test_query_to_trend_report() {
    let exec = seeded();
    let table = exec
        .execute("SELECT read_at, usage_gallons FROM readings ORDER BY read_at")
        .unwrap();

    let types: Vec<ChartType> = recommend(&table).iter().map(|r| r.chart_type).collect();
    assert_eq!(types[0], ChartType::Line);

    let report = ReportGenerator::default().generate(&table, "January Usage", "trend report", true, true);
    assert!(!report.is_error());
    assert_eq!(report.meta[1].value, "2024-01-01 to 2024-01-04");
    assert!(report.section_of_kind(SectionKind::Chart).is_some());

    let html = report.to_html();
    assert!(html.contains("January Usage"));
    assert!(html.contains("Time span: 3 days"));
}

#[test]
fn test_driver_error_passes_through() {
    let exec = seeded();
    let err = exec.execute("SELECT nope FROM readings").unwrap_err();
    assert!(err.to_string().contains("no such column"));
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("water.db");

    let exec = SqliteExecutor::open(&path).unwrap();
    exec.execute_batch(SEED).unwrap();
    drop(exec);

    let reopened = SqliteExecutor::open(&path).unwrap();
    let table = reopened.execute("SELECT COUNT(*) AS n FROM meters").unwrap();
    assert_eq!(table.rows()[0][0], Value::Int(3));
}
