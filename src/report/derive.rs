//! Figures shared by all report templates.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{thousands, MetricCard, Recommendation, StatItem, NO_DATA};
use crate::table::stats::{self, Describe};
use crate::table::{ColumnType, ResultTable, TableError, Value};

const INSIGHT_NUMERIC_COLUMNS: usize = 3;
const INSIGHT_CATEGORICAL_COLUMNS: usize = 2;

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

// =============================================================================
// Insights
// =============================================================================

/// Findings derived from column types and contents.
pub fn insights(table: &ResultTable) -> Vec<String> {
    if table.is_empty() {
        return vec![NO_DATA.to_string()];
    }

    let mut lines = vec![format!(
        "Dataset contains {} records across {} columns",
        thousands(table.row_count()),
        table.column_count()
    )];

    for idx in table.numeric_columns().into_iter().take(INSIGHT_NUMERIC_COLUMNS) {
        let values = table.numeric_values(idx);
        if let (Some(mean), Some(min), Some(max)) =
            (stats::mean(&values), stats::min(&values), stats::max(&values))
        {
            lines.push(format!(
                "{}: Average {:.2}, Range {:.2} to {:.2}",
                table.column_name(idx),
                mean,
                min,
                max
            ));
        }
    }

    for idx in table
        .categorical_columns()
        .into_iter()
        .take(INSIGHT_CATEGORICAL_COLUMNS)
    {
        lines.push(format!(
            "{}: {} unique values, most common: '{}'",
            table.column_name(idx),
            stats::nunique(table.values(idx)),
            most_common(table, idx)
        ));
    }

    let with_missing = columns_with_missing(table);
    if with_missing > 0 {
        lines.push(format!("Missing data found in {} columns", with_missing));
    } else {
        lines.push("No missing data detected".to_string());
    }

    lines
}

fn most_common(table: &ResultTable, idx: usize) -> String {
    stats::mode(table.values(idx))
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn columns_with_missing(table: &ResultTable) -> usize {
    (0..table.column_count())
        .filter(|&idx| table.null_count(idx) > 0)
        .count()
}

// =============================================================================
// Summary Statistics
// =============================================================================

/// Headline figures for the metric cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub numeric_columns: usize,
    /// Mean of the numeric columns' means. Zero without numeric data.
    pub average_value: f64,
    /// Percentage of non-null cells.
    pub completeness: f64,
}

pub fn summary_stats(table: &ResultTable) -> SummaryStats {
    let numeric = table.numeric_columns();
    let means: Vec<f64> = numeric
        .iter()
        .filter_map(|&idx| stats::mean(&table.numeric_values(idx)))
        .collect();

    SummaryStats {
        total_records: table.row_count(),
        numeric_columns: numeric.len(),
        average_value: stats::mean(&means).unwrap_or(0.0),
        completeness: completeness(table),
    }
}

/// `100 * (1 - nulls / cells)`, or 100 for a table with no cells.
pub fn completeness(table: &ResultTable) -> f64 {
    let cells = table.cell_count();
    if cells == 0 {
        return 100.0;
    }
    100.0 * (1.0 - table.total_nulls() as f64 / cells as f64)
}

impl SummaryStats {
    pub fn cards(&self) -> Vec<MetricCard> {
        let card = |label: &str, value: String| MetricCard {
            label: label.to_string(),
            value,
        };
        vec![
            card("Total Records", thousands(self.total_records)),
            card("Numeric Columns", self.numeric_columns.to_string()),
            card("Average Value", format!("{:.2}", self.average_value)),
            card("Data Completeness", format!("{:.1}%", self.completeness)),
        ]
    }
}

// =============================================================================
// Recommendations
// =============================================================================

/// Rule-based suggestions. Empty for an empty table.
///
/// Rules are checked in order and can all fire; the exploration suggestion
/// is added only when none did.
pub fn recommendations(table: &ResultTable, large_dataset_threshold: usize) -> Vec<Recommendation> {
    if table.is_empty() {
        return Vec::new();
    }

    let rec = |title: &str, content: String| Recommendation {
        title: title.to_string(),
        content,
    };
    let mut out = Vec::new();

    let with_missing = columns_with_missing(table);
    if with_missing > 0 {
        out.push(rec(
            "Data Quality Improvement",
            format!(
                "Consider addressing missing data in {} columns to improve analysis accuracy.",
                with_missing
            ),
        ));
    }

    if table.row_count() > large_dataset_threshold {
        out.push(rec(
            "Performance Optimization",
            "Large dataset detected. Consider using data sampling or aggregation for faster analysis."
                .to_string(),
        ));
    }

    if table.numeric_columns().len() >= 2 {
        out.push(rec(
            "Advanced Analysis",
            "Multiple numeric columns detected. Consider correlation analysis and predictive modeling."
                .to_string(),
        ));
    }

    if out.is_empty() {
        out.push(rec(
            "Data Exploration",
            "Explore different visualization types and statistical analyses to uncover hidden patterns."
                .to_string(),
        ));
    }

    out
}

// =============================================================================
// Data Quality
// =============================================================================

/// Nulls in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingColumn {
    pub column: String,
    pub missing: usize,
    /// Share of the column's rows, rounded to two decimals.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAssessment {
    /// Completeness percentage rounded to one decimal.
    pub completeness: f64,
    pub missing_cells: usize,
    pub total_cells: usize,
    /// Columns with at least one null, in table order.
    pub columns: Vec<MissingColumn>,
}

pub(crate) fn quality(table: &ResultTable) -> QualityAssessment {
    let rows = table.row_count();
    let columns = (0..table.column_count())
        .filter_map(|idx| {
            let missing = table.null_count(idx);
            (missing > 0).then(|| MissingColumn {
                column: table.column_name(idx).to_string(),
                missing,
                percent: round_to(missing as f64 / rows as f64 * 100.0, 2),
            })
        })
        .collect();

    QualityAssessment {
        completeness: round_to(completeness(table), 1),
        missing_cells: table.total_nulls(),
        total_cells: table.cell_count(),
        columns,
    }
}

// =============================================================================
// Statistics Tables
// =============================================================================

/// `describe()`-style table: one row per statistic, one column per numeric
/// column. `None` without numeric columns.
pub(crate) fn describe_table(table: &ResultTable) -> Result<Option<ResultTable>, TableError> {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return Ok(None);
    }

    let described: Vec<Option<Describe>> = numeric
        .iter()
        .map(|&idx| stats::describe(&table.numeric_values(idx)))
        .collect();

    let mut names = vec![String::new()];
    names.extend(numeric.iter().map(|&idx| table.column_name(idx).to_string()));

    let rows = Describe::LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut row = vec![Value::from(*label)];
            row.extend(described.iter().map(|d| {
                d.as_ref()
                    .and_then(|d| d.cells()[i])
                    .map(|v| Value::Float(round_to(v, 6)))
                    .unwrap_or(Value::Null)
            }));
            row
        })
        .collect();

    ResultTable::new(names, rows).map(Some)
}

/// Distinct count, mode and nulls per categorical column.
pub(crate) fn categorical_table(table: &ResultTable) -> Result<Option<ResultTable>, TableError> {
    let categorical = table.categorical_columns();
    if categorical.is_empty() {
        return Ok(None);
    }

    let rows = categorical
        .iter()
        .map(|&idx| {
            vec![
                Value::from(table.column_name(idx)),
                Value::Int(stats::nunique(table.values(idx)) as i64),
                Value::from(most_common(table, idx)),
                Value::Int(table.null_count(idx) as i64),
            ]
        })
        .collect();

    let names = ["Column", "Unique Values", "Most Common", "Missing"]
        .map(String::from)
        .to_vec();
    ResultTable::new(names, rows).map(Some)
}

/// Column counts per type, most common type first.
pub(crate) fn column_type_counts(table: &ResultTable) -> Vec<StatItem> {
    let mut counts: Vec<(ColumnType, usize)> = Vec::new();
    for column in table.columns() {
        match counts.iter_mut().find(|(t, _)| *t == column.column_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((column.column_type, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(column_type, n)| StatItem {
            number: n.to_string(),
            description: format!("{} columns", column_type),
        })
        .collect()
}

// =============================================================================
// Dates
// =============================================================================

/// Earliest and latest value of a datetime column.
pub(crate) fn date_bounds(table: &ResultTable, idx: usize) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut dates = table.values(idx).filter_map(Value::as_datetime);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Human-readable range of the first datetime column.
pub(crate) fn date_range(table: &ResultTable) -> String {
    match table.datetime_columns().first() {
        None => "No date columns detected".to_string(),
        Some(&idx) => match date_bounds(table, idx) {
            Some((lo, hi)) => format!("{} to {}", lo.format("%Y-%m-%d"), hi.format("%Y-%m-%d")),
            None => "Date range unavailable".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn readings() -> ResultTable {
        ResultTable::new(
            vec!["zone".into(), "usage".into(), "temp".into()],
            vec![
                vec!["A".into(), 10_i64.into(), Value::Null],
                vec!["A".into(), 5_i64.into(), 20.5.into()],
                vec!["B".into(), 3_i64.into(), 22.5.into()],
                vec![Value::Null, 6_i64.into(), 21.0.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_insights() {
        assert_eq!(
            insights(&readings()),
            vec![
                "Dataset contains 4 records across 3 columns",
                "usage: Average 6.00, Range 3.00 to 10.00",
                "temp: Average 21.33, Range 20.50 to 22.50",
                "zone: 2 unique values, most common: 'A'",
                "Missing data found in 2 columns",
            ]
        );
    }

    #[test]
    fn test_insights_empty_table() {
        let table = ResultTable::empty(vec!["a".into()]);
        assert_eq!(insights(&table), vec![NO_DATA]);
    }

    #[test]
    fn test_summary_stats() {
        let summary = summary_stats(&readings());
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.numeric_columns, 2);
        assert!((summary.average_value - (6.0 + 64.0 / 3.0) / 2.0).abs() < 1e-9);
        assert!((summary.completeness - 100.0 * (1.0 - 2.0 / 12.0)).abs() < 1e-9);

        let cards = summary.cards();
        assert_eq!(cards[0].value, "4");
        assert_eq!(cards[3].value, "83.3%");
    }

    #[test]
    fn test_summary_without_numeric_columns() {
        let table = ResultTable::new(vec!["name".into()], vec![vec!["x".into()]]).unwrap();
        let summary = summary_stats(&table);
        assert_eq!(summary.average_value, 0.0);
        assert_eq!(summary.completeness, 100.0);
    }

    #[test]
    fn test_recommendation_rules() {
        let titles: Vec<String> = recommendations(&readings(), 10_000)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Data Quality Improvement", "Advanced Analysis"]);

        let titles: Vec<String> = recommendations(&readings(), 3)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Data Quality Improvement", "Performance Optimization", "Advanced Analysis"]
        );

        let plain = ResultTable::new(vec!["name".into()], vec![vec!["x".into()]]).unwrap();
        let recs = recommendations(&plain, 10_000);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Data Exploration");
    }

    #[test]
    fn test_quality_in_column_order() {
        let quality = quality(&readings());
        assert_eq!(quality.completeness, 83.3);
        assert_eq!(quality.missing_cells, 2);
        assert_eq!(quality.total_cells, 12);
        assert_eq!(
            quality.columns,
            vec![
                MissingColumn {
                    column: "zone".into(),
                    missing: 1,
                    percent: 25.0
                },
                MissingColumn {
                    column: "temp".into(),
                    missing: 1,
                    percent: 25.0
                },
            ]
        );
    }

    #[test]
    fn test_describe_table_shape() {
        let described = describe_table(&readings()).unwrap().unwrap();
        assert_eq!(described.column_names(), vec!["", "usage", "temp"]);
        assert_eq!(described.row_count(), 8);
        assert_eq!(described.rows()[0][2], Value::Float(3.0));
        assert_eq!(described.rows()[7][1], Value::Float(10.0));
    }

    #[test]
    fn test_categorical_table() {
        let table = categorical_table(&readings()).unwrap().unwrap();
        assert_eq!(
            table.rows()[0],
            vec![
                Value::from("zone"),
                Value::Int(2),
                Value::from("A"),
                Value::Int(1)
            ]
        );
    }

    #[test]
    fn test_column_type_counts() {
        let items = column_type_counts(&readings());
        assert_eq!(items[0].number, "2");
        assert_eq!(items[0].description, "numeric columns");
        assert_eq!(items[1].description, "categorical columns");
    }

    #[test]
    fn test_date_range() {
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let table = ResultTable::new(
            vec!["read_at".into()],
            vec![vec![day(9).into()], vec![day(2).into()], vec![Value::Null]],
        )
        .unwrap();
        assert_eq!(date_range(&table), "2024-01-02 to 2024-01-09");
        assert_eq!(date_range(&readings()), "No date columns detected");
    }
}
