//! The three report templates.

use chrono::Datelike;
use tracing::{debug, warn};

use super::derive::{self, date_bounds, date_range, insights, quality, recommendations, summary_stats};
use super::{
    thousands, DataPreview, InsightsBox, MetaItem, Report, ReportConfig, ReportError,
    ReportType, Request, Section, SectionPayload, StatBlock, StatItem, NO_DATA,
};
use crate::chart::{create_chart, ChartSpec, ChartTheme, ChartType, RoleBindings};
use crate::table::stats::group_sum;
use crate::table::{ResultTable, TableError, Value};

const TIMESTAMP_FORMAT: &str = "%B %d, %Y at %I:%M %p";

type SectionResult = Result<Section, ReportError>;

pub(crate) fn assemble(
    config: &ReportConfig,
    report_type: ReportType,
    req: &Request<'_>,
) -> Result<Report, ReportError> {
    let mut sections = Vec::new();

    // Templates without their own insights still say there is nothing to see
    if req.table.is_empty() && report_type != ReportType::ExecutiveSummary {
        sections.push(no_data_section());
    }

    let (meta, body, footer) = match report_type {
        ReportType::ExecutiveSummary => (
            executive_meta(req),
            executive(config, req)?,
            [
                "This report was automatically generated by SQL Report Generator",
                "Confidential Business Intelligence Report",
            ],
        ),
        ReportType::DetailedAnalysis => (
            detailed_meta(req),
            detailed(config, req)?,
            [
                "This detailed analysis was generated by SQL Report Generator",
                "Comprehensive Data Analysis Report",
            ],
        ),
        ReportType::TrendReport => (
            trend_meta(req),
            trend(config, req)?,
            [
                "This trend analysis was generated by SQL Report Generator",
                "Time Series Analysis Report",
            ],
        ),
    };
    sections.extend(body);

    Ok(Report {
        title: req.title.to_string(),
        subtitle: report_type.subtitle().to_string(),
        report_type: Some(report_type),
        generated_at: req.generated_at,
        meta,
        sections,
        footer: vec![
            footer[0].to_string(),
            format!("© {} - {}", req.generated_at.year(), footer[1]),
        ],
        error: None,
    })
}

/// Keep an optional section, logging it when it could not be built.
fn optional(title: &str, built: Result<Option<Section>, ReportError>) -> Option<Section> {
    match built {
        Ok(section) => section,
        Err(e) => {
            warn!(section = title, error = %e, "Dropping report section");
            None
        }
    }
}

fn timestamp(req: &Request<'_>) -> MetaItem {
    MetaItem::new(
        "Report Generated",
        req.generated_at.format(TIMESTAMP_FORMAT).to_string(),
    )
}

// =============================================================================
// Executive Summary
// =============================================================================

fn executive_meta(req: &Request<'_>) -> Vec<MetaItem> {
    vec![
        timestamp(req),
        MetaItem::new("Data Points", format!("{} records", thousands(req.table.row_count()))),
        MetaItem::new("Columns Analyzed", req.table.column_count().to_string()),
        MetaItem::new("Report Type", "Executive Summary"),
    ]
}

fn executive(config: &ReportConfig, req: &Request<'_>) -> Result<Vec<Section>, ReportError> {
    let table = req.table;
    let mut sections = vec![
        Section::new(
            "Key Metrics",
            SectionPayload::Metrics(summary_stats(table).cards()),
        ),
        key_insights(table)?,
    ];

    if req.include_charts && !table.is_empty() {
        sections.extend(optional(
            "Visual Analysis",
            overview_charts(table, &config.theme),
        ));
    }

    sections.push(data_preview(table, "Data Summary", config.executive_preview_rows)?);
    sections.push(Section::new(
        "Recommendations",
        SectionPayload::Recommendations(recommendations(table, config.large_dataset_threshold)),
    ));

    Ok(sections)
}

// =============================================================================
// Detailed Analysis
// =============================================================================

fn detailed_meta(req: &Request<'_>) -> Vec<MetaItem> {
    vec![
        timestamp(req),
        MetaItem::new(
            "Dataset Size",
            format!(
                "{} rows × {} columns",
                thousands(req.table.row_count()),
                req.table.column_count()
            ),
        ),
        MetaItem::new("Analysis Scope", "Complete dataset analysis"),
    ]
}

fn detailed(config: &ReportConfig, req: &Request<'_>) -> Result<Vec<Section>, ReportError> {
    let table = req.table;
    let mut sections = vec![Section::new(
        "Dataset Overview",
        SectionPayload::Statistics(vec![StatBlock::Items {
            heading: Some("Column Types".to_string()),
            items: derive::column_type_counts(table),
        }]),
    )];

    if req.include_statistics {
        sections.extend(optional("Detailed Statistics", detailed_statistics(table)));
    }

    sections.push(data_preview(
        table,
        "Complete Data View",
        config.detailed_preview_rows,
    )?);

    if req.include_charts && !table.is_empty() {
        sections.extend(optional(
            "Comprehensive Visual Analysis",
            comprehensive_charts(table, &config.theme),
        ));
    }

    sections.push(Section::new(
        "Data Quality Assessment",
        SectionPayload::QualityAssessment(quality(table)),
    ));

    Ok(sections)
}

fn detailed_statistics(table: &ResultTable) -> Result<Option<Section>, ReportError> {
    if table.is_empty() {
        return Ok(None);
    }

    let mut blocks = Vec::new();
    if let Some(described) = derive::describe_table(table)? {
        blocks.push(StatBlock::Table {
            heading: "Numeric Columns Analysis".to_string(),
            table: described,
        });
    }
    if let Some(categorical) = derive::categorical_table(table)? {
        blocks.push(StatBlock::Table {
            heading: "Categorical Columns Analysis".to_string(),
            table: categorical,
        });
    }

    if blocks.is_empty() {
        return Ok(None);
    }
    Ok(Some(Section::new(
        "Detailed Statistics",
        SectionPayload::Statistics(blocks),
    )))
}

// =============================================================================
// Trend Report
// =============================================================================

fn trend_meta(req: &Request<'_>) -> Vec<MetaItem> {
    vec![
        timestamp(req),
        MetaItem::new("Analysis Period", date_range(req.table)),
        MetaItem::new("Data Points", format!("{} records", thousands(req.table.row_count()))),
        MetaItem::new("Focus", "Temporal patterns and trends"),
    ]
}

fn trend(config: &ReportConfig, req: &Request<'_>) -> Result<Vec<Section>, ReportError> {
    let table = req.table;
    let mut sections = vec![trend_analysis(table)?];

    if req.include_charts && !table.is_empty() {
        sections.extend(optional(
            "Visual Analysis",
            overview_charts(table, &config.theme),
        ));
    }

    sections.push(period_summary(table)?);
    Ok(sections)
}

fn trend_analysis(table: &ResultTable) -> SectionResult {
    let insights = match table.datetime_columns().first() {
        None => InsightsBox {
            heading: None,
            lines: vec!["No time-based columns detected for trend analysis.".to_string()],
        },
        Some(&idx) => {
            let mut lines = vec![
                format!("Analysis period: {}", date_range(table)),
                format!("Total data points: {}", thousands(table.row_count())),
            ];
            if let Some((first, last)) = date_bounds(table, idx) {
                lines.push(format!("Time span: {} days", (last - first).num_days()));
            }
            InsightsBox {
                heading: Some("Temporal Analysis Results".to_string()),
                lines,
            }
        }
    };
    Ok(Section::new("Trend Analysis", SectionPayload::Insights(insights)))
}

fn period_summary(table: &ResultTable) -> SectionResult {
    let block = if table.datetime_columns().is_empty() {
        StatBlock::Note {
            text: "No date columns available for period analysis.".to_string(),
        }
    } else {
        StatBlock::Items {
            heading: None,
            items: vec![StatItem {
                number: table.row_count().to_string(),
                description: "Total Records".to_string(),
            }],
        }
    };
    Ok(Section::new("Period Summary", SectionPayload::Statistics(vec![block])))
}

// =============================================================================
// Shared Sections
// =============================================================================

fn no_data_section() -> Section {
    Section::new(
        "Key Insights",
        SectionPayload::Insights(InsightsBox {
            heading: Some("Automated Analysis Results:".to_string()),
            lines: vec![NO_DATA.to_string()],
        }),
    )
}

fn key_insights(table: &ResultTable) -> SectionResult {
    Ok(Section::new(
        "Key Insights",
        SectionPayload::Insights(InsightsBox {
            heading: Some("Automated Analysis Results:".to_string()),
            lines: insights(table),
        }),
    ))
}

fn data_preview(table: &ResultTable, title: &str, max_rows: usize) -> SectionResult {
    Ok(Section::new(
        title,
        SectionPayload::DataPreview(DataPreview {
            table: table.head(max_rows),
            total_rows: table.row_count(),
        }),
    ))
}

// =============================================================================
// Chart Sections
// =============================================================================

/// `value` summed per distinct `label`, as a two-column table.
fn aggregated(table: &ResultTable, label: usize, value: usize) -> Result<ResultTable, TableError> {
    let rows = group_sum(table, label, value)
        .into_iter()
        .map(|(key, total)| vec![key, Value::Float(total)])
        .collect();
    ResultTable::new(
        vec![
            table.column_name(label).to_string(),
            table.column_name(value).to_string(),
        ],
        rows,
    )
}

fn category_bar(
    table: &ResultTable,
    label: usize,
    value: usize,
    theme: &ChartTheme,
) -> Result<ChartSpec, ReportError> {
    let summed = aggregated(table, label, value)?;
    let bindings = RoleBindings::new()
        .x(table.column_name(label))
        .y(table.column_name(value));
    Ok(create_chart(&summed, ChartType::Bar, &bindings, theme)?)
}

/// Collect the charts that could be built. Fails only when every attempt
/// failed.
fn chart_section(
    title: &str,
    attempts: Vec<(ChartType, Result<ChartSpec, ReportError>)>,
) -> Result<Option<Section>, ReportError> {
    let mut charts = Vec::new();
    let mut last_error = None;

    for (chart_type, built) in attempts {
        match built {
            Ok(chart) => charts.push(chart),
            Err(e) => {
                warn!(chart = %chart_type, error = %e, "Skipping chart");
                last_error = Some(e);
            }
        }
    }

    debug!(section = title, charts = charts.len(), "Built chart section");
    match (charts.is_empty(), last_error) {
        (false, _) => Ok(Some(Section::new(title, SectionPayload::Charts(charts)))),
        (true, Some(e)) => Err(e),
        (true, None) => Ok(None),
    }
}

/// Histogram of the first numeric column and its sum per first category.
fn overview_charts(
    table: &ResultTable,
    theme: &ChartTheme,
) -> Result<Option<Section>, ReportError> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();
    let mut attempts = Vec::new();

    if let Some(&n) = numeric.first() {
        let bindings = RoleBindings::new().x(table.column_name(n));
        attempts.push((
            ChartType::Histogram,
            create_chart(table, ChartType::Histogram, &bindings, theme).map_err(ReportError::from),
        ));

        if let Some(&c) = categorical.first() {
            attempts.push((ChartType::Bar, category_bar(table, c, n, theme)));
        }
    }

    chart_section("Visual Analysis", attempts)
}

/// Up to four charts, each added only when the table has columns for it.
fn comprehensive_charts(
    table: &ResultTable,
    theme: &ChartTheme,
) -> Result<Option<Section>, ReportError> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();
    let name = |idx: usize| table.column_name(idx);
    let mut attempts = Vec::new();

    if let Some(&n) = numeric.first() {
        let built = create_chart(
            table,
            ChartType::Histogram,
            &RoleBindings::new().x(name(n)),
            theme,
        )
        .map(|c| c.with_title(format!("Distribution Analysis: {}", name(n))));
        attempts.push((ChartType::Histogram, built.map_err(ReportError::from)));
    }

    if let (Some(&c), Some(&n)) = (categorical.first(), numeric.first()) {
        let built =
            category_bar(table, c, n, theme).map(|chart| chart.with_title("Category Comparison"));
        attempts.push((ChartType::Bar, built));
    }

    if let &[x, y, ..] = numeric.as_slice() {
        let built = create_chart(
            table,
            ChartType::Scatter,
            &RoleBindings::new().x(name(x)).y(name(y)),
            theme,
        )
        .map(|c| c.with_title("Correlation Analysis"));
        attempts.push((ChartType::Scatter, built.map_err(ReportError::from)));
    }

    if let Some(&n) = numeric.first() {
        let built = create_chart(table, ChartType::Box, &RoleBindings::new().x(name(n)), theme)
            .map(|c| c.with_title(format!("Statistical Distribution: {}", name(n))));
        attempts.push((ChartType::Box, built.map_err(ReportError::from)));
    }

    chart_section("Comprehensive Visual Analysis", attempts)
}
