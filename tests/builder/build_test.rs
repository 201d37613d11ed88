use insta::assert_snapshot;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlreport::builder::{
    build, build_for_dialect, Aggregate, Filter, FilterOp, QueryBuilder, Relationship, Selection,
    ValidationError,
};
use sqlreport::sql::Dialect;

fn usage() -> Selection {
    Selection::new()
        .table("readings")
        .column("readings.zone")
        .column("readings.usage_gallons")
}

fn count(sql: &str, needle: &str) -> usize {
    sql.matches(needle).count()
}

#[test]
fn test_sum_alias() {
    let selection = usage()
        .group_by("readings.zone")
        .aggregate("readings.usage_gallons", Aggregate::Sum);

    let sql = build(&selection).unwrap();
    assert!(sql.contains("SUM(readings.usage_gallons) AS sum_usage_gallons"));
    assert!(sql.contains("GROUP BY readings.zone"));
}

#[test]
fn test_clauses_present_only_when_requested() {
    let plain = build(&usage()).unwrap();
    assert_eq!(count(&plain, "SELECT"), 1);
    assert_eq!(count(&plain, "FROM"), 1);
    assert!(!plain.contains("WHERE"));
    assert!(!plain.contains("GROUP BY"));
    assert!(!plain.contains("ORDER BY"));
    assert!(!plain.contains("JOIN"));

    let full = build(
        &usage()
            .table("meters")
            .group_by("readings.zone")
            .aggregate("readings.usage_gallons", Aggregate::Max)
            .filter(Filter::new("readings.zone", FilterOp::Ne, "South"))
            .order_by("readings.zone"),
    )
    .unwrap();
    assert_eq!(count(&full, "SELECT"), 1);
    assert_eq!(count(&full, "FROM"), 1);
    assert_eq!(count(&full, "JOIN"), 1);
    assert_eq!(count(&full, "WHERE"), 1);
    assert_eq!(count(&full, "GROUP BY"), 1);
    assert_eq!(count(&full, "ORDER BY"), 1);
}

#[test]
fn test_full_selection_layout() {
    let selection = usage()
        .table("meters")
        .group_by("readings.zone")
        .aggregate("readings.usage_gallons", Aggregate::Sum)
        .filter(Filter::new("readings.zone", FilterOp::Eq, "North"))
        .order_by("readings.usage_gallons");

    assert_snapshot!(build(&selection).unwrap(), @r"
    SELECT readings.zone,
        SUM(readings.usage_gallons) AS sum_usage_gallons
    FROM readings
    JOIN meters ON readings.id = meters.id
    WHERE readings.zone = 'North'
    GROUP BY readings.zone
    ORDER BY sum_usage_gallons DESC
    ");
}

#[test]
fn test_customer_tables_join_on_customer_id() {
    let selection = Selection::new()
        .table("customers")
        .table("customer_accounts")
        .column("customers.name");

    let sql = build(&selection).unwrap();
    assert!(sql.contains("JOIN customer_accounts ON customers.customer_id = customer_accounts.customer_id"));
}

#[test]
fn test_declared_relationship_wins() {
    let selection = usage().table("meters").column("meters.serial");
    let sql = QueryBuilder::new()
        .with_relationships(vec![Relationship::new(
            "meters",
            "meter_id",
            "readings",
            "meter_ref",
        )])
        .build(&selection)
        .unwrap();

    assert!(sql.contains("JOIN meters ON readings.meter_ref = meters.meter_id"));
}

#[test]
fn test_postgres_quotes_identifiers() {
    let sql = build_for_dialect(&usage(), Dialect::Postgres).unwrap();
    assert_eq!(
        sql,
        "SELECT \"readings\".\"zone\",\n    \"readings\".\"usage_gallons\"\nFROM \"readings\""
    );
}

#[test]
fn test_missing_tables_and_columns() {
    assert_eq!(
        build(&Selection::new().column("readings.zone")),
        Err(ValidationError::NoTables)
    );
    assert_eq!(
        build(&Selection::new().table("readings")),
        Err(ValidationError::NoColumns)
    );
}

#[test]
fn test_selection_from_json() {
    let json = r#"{
        "tables": ["readings"],
        "columns": ["readings.zone", "readings.usage_gallons"],
        "group_by": ["readings.zone"],
        "aggregations": {"readings.usage_gallons": "AVG"},
        "filters": [
            {"column": "readings.usage_gallons", "operator": ">=", "value": 100},
            {"column": "readings.zone", "operator": "=", "value": null}
        ],
        "order_by": ["readings.usage_gallons"]
    }"#;

    let selection: Selection = serde_json::from_str(json).unwrap();
    assert_snapshot!(build(&selection).unwrap(), @r"
    SELECT readings.zone,
        AVG(readings.usage_gallons) AS avg_usage_gallons
    FROM readings
    WHERE readings.usage_gallons >= 100
    GROUP BY readings.zone
    ORDER BY avg_usage_gallons DESC
    ");
}

#[test]
fn test_generated_sql_parses() {
    let selection = usage()
        .table("meters")
        .group_by("readings.zone")
        .aggregate("readings.usage_gallons", Aggregate::Count)
        .filter(Filter::new("readings.zone", FilterOp::Like, "N%"))
        .filter(Filter::new("readings.usage_gallons", FilterOp::Lt, 42.5));

    let sql = build(&selection).unwrap();
    Parser::parse_sql(&GenericDialect {}, &sql).unwrap();
}
