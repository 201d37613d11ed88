use sqlreport::builder::{explain_sql, format_sql, validate, ValidationReport};

#[test]
fn test_valid_selection() {
    let report = validate(&["readings"], &["readings.zone"]);
    assert_eq!(
        report,
        ValidationReport {
            is_valid: true,
            errors: vec![],
            warnings: vec![],
        }
    );
}

#[test]
fn test_no_columns_is_error() {
    let report = validate(&["readings"], &[]);
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec!["At least one column must be selected"]);
}

#[test]
fn test_no_tables_is_error_and_warns_for_every_qualified_column() {
    let report = validate(&[], &["readings.zone", "meters.serial"]);
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec!["At least one table must be selected"]);
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn test_unqualified_columns_never_warn() {
    let report = validate(&["readings"], &["zone", "usage_gallons"]);
    assert!(report.is_valid);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_validate_accepts_owned_strings() {
    let tables = vec!["readings".to_string()];
    let columns = vec!["customers.name".to_string()];
    let report = validate(&tables, &columns);
    assert!(report.is_valid);
    assert_eq!(
        report.warnings,
        vec!["Column customers.name references table customers which is not selected"]
    );
}

#[test]
fn test_explain_join_and_filter() {
    let text = explain_sql("SELECT a FROM t JOIN u ON t.id = u.id WHERE a = 1");
    assert_eq!(
        text,
        "Combines data from multiple tables. Filters data based on specific conditions."
    );
}

#[test]
fn test_format_keeps_generated_layout() {
    let sql = "SELECT readings.zone,\n    SUM(readings.usage) AS sum_usage\nFROM readings\nGROUP BY readings.zone";
    assert_eq!(format_sql(sql), sql);
}
