//! Report assembly engine.
//!
//! Builds a structured [`Report`] from a [`ResultTable`] using one of three
//! fixed templates. Every section is derived from the table's shape and
//! contents. Charts come from [`crate::chart`].
//!
//! Generation is best-effort. A section that fails is logged and left out,
//! and a chart that fails is skipped within its section. Only a failure in a
//! section every template needs turns the whole result into an error report.
//! [`ReportGenerator::generate`] always returns a renderable [`Report`].
//!
//! ```
//! use sqlreport::report::{ReportGenerator, SectionKind};
//! use sqlreport::table::ResultTable;
//!
//! let table = ResultTable::empty(vec!["zone".into(), "usage".into()]);
//! let report = ReportGenerator::default().generate(&table, "Usage", "executive summary", true, true);
//!
//! assert!(!report.is_error());
//! assert!(report.sections.iter().any(|s| s.kind == SectionKind::Insights));
//! ```

mod derive;
mod html;
mod templates;

pub use derive::{
    completeness, insights, recommendations, summary_stats, MissingColumn, QualityAssessment,
    SummaryStats,
};
pub use html::{dashboard_html, escape_html};

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{error, info};

use crate::chart::{ChartBuildError, ChartSpec, ChartTheme};
use crate::table::{ResultTable, TableError};

pub(crate) const NO_DATA: &str = "No data available for analysis.";

// =============================================================================
// Report Types
// =============================================================================

/// Template selected for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    ExecutiveSummary,
    DetailedAnalysis,
    TrendReport,
}

impl ReportType {
    /// Resolve a user-facing name such as `"Executive Summary"`.
    ///
    /// Names are lowercased with spaces turned into underscores. Anything
    /// unrecognised selects [`ReportType::DetailedAnalysis`].
    pub fn from_name(name: &str) -> ReportType {
        let key = name.trim().to_lowercase().replace(' ', "_");
        match key.as_str() {
            "executive_summary" => ReportType::ExecutiveSummary,
            "detailed_analysis" => ReportType::DetailedAnalysis,
            "trend_report" => ReportType::TrendReport,
            _ => {
                info!(requested = name, "Unknown report type, using detailed analysis");
                ReportType::DetailedAnalysis
            }
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ReportType::ExecutiveSummary => "executive_summary",
            ReportType::DetailedAnalysis => "detailed_analysis",
            ReportType::TrendReport => "trend_report",
        }
    }

    /// Subtitle shown under the report title.
    pub fn subtitle(&self) -> &'static str {
        match self {
            ReportType::ExecutiveSummary => "Executive Summary Report",
            ReportType::DetailedAnalysis => "Detailed Analysis Report",
            ReportType::TrendReport => "Trend Analysis Report",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Report Structure
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Metrics,
    Insights,
    DataPreview,
    Chart,
    Statistics,
    QualityAssessment,
    Recommendations,
}

/// A headline number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

/// A boxed list of findings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsBox {
    /// Heading inside the box. Without one the lines render as plain text.
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

/// The first rows of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPreview {
    pub table: ResultTable,
    /// Row count of the full table.
    pub total_rows: usize,
}

impl DataPreview {
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.table.row_count()
    }
}

/// A big number with a caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatItem {
    pub number: String,
    pub description: String,
}

/// One block of a statistics section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatBlock {
    Table {
        heading: String,
        table: ResultTable,
    },
    Items {
        heading: Option<String>,
        items: Vec<StatItem>,
    },
    Note {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub content: String,
}

/// Section content. Each variant matches one [`SectionKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SectionPayload {
    Metrics(Vec<MetricCard>),
    Insights(InsightsBox),
    DataPreview(DataPreview),
    Charts(Vec<ChartSpec>),
    Statistics(Vec<StatBlock>),
    QualityAssessment(QualityAssessment),
    Recommendations(Vec<Recommendation>),
}

impl SectionPayload {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionPayload::Metrics(_) => SectionKind::Metrics,
            SectionPayload::Insights(_) => SectionKind::Insights,
            SectionPayload::DataPreview(_) => SectionKind::DataPreview,
            SectionPayload::Charts(_) => SectionKind::Chart,
            SectionPayload::Statistics(_) => SectionKind::Statistics,
            SectionPayload::QualityAssessment(_) => SectionKind::QualityAssessment,
            SectionPayload::Recommendations(_) => SectionKind::Recommendations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub kind: SectionKind,
    pub payload: SectionPayload,
}

impl Section {
    pub fn new(title: impl Into<String>, payload: SectionPayload) -> Self {
        Self {
            title: title.into(),
            kind: payload.kind(),
            payload,
        }
    }

    /// Charts in this section, if it is a chart section.
    pub fn charts(&self) -> &[ChartSpec] {
        match &self.payload {
            SectionPayload::Charts(charts) => charts,
            _ => &[],
        }
    }
}

/// A label/value pair in the report header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaItem {
    pub label: String,
    pub value: String,
}

impl MetaItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A finished report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub subtitle: String,
    /// `None` for error reports.
    pub report_type: Option<ReportType>,
    pub generated_at: NaiveDateTime,
    pub meta: Vec<MetaItem>,
    pub sections: Vec<Section>,
    pub footer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    /// The minimal document returned when generation fails.
    pub fn error(message: impl Into<String>, generated_at: NaiveDateTime) -> Self {
        Self {
            title: "Report Generation Error".to_string(),
            subtitle: String::new(),
            report_type: None,
            generated_at,
            meta: Vec::new(),
            sections: Vec::new(),
            footer: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn section_of_kind(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Every chart in the report, in document order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().flat_map(|s| s.charts())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Failure while assembling a section. Never escapes [`ReportGenerator`].
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to build table: {0}")]
    Table(#[from] TableError),

    #[error("Failed to build chart: {0}")]
    Chart(#[from] ChartBuildError),
}

// =============================================================================
// Generator
// =============================================================================

/// Knobs for report generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub theme: ChartTheme,
    pub executive_preview_rows: usize,
    pub detailed_preview_rows: usize,
    /// Row count above which sampling is recommended.
    pub large_dataset_threshold: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            theme: ChartTheme::default(),
            executive_preview_rows: 10,
            detailed_preview_rows: 50,
            large_dataset_threshold: 10_000,
        }
    }
}

/// What to put in a report, independent of template.
pub(crate) struct Request<'a> {
    pub table: &'a ResultTable,
    pub title: &'a str,
    pub include_charts: bool,
    pub include_statistics: bool,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate a report stamped with the current local time.
    pub fn generate(
        &self,
        table: &ResultTable,
        title: &str,
        report_type: &str,
        include_charts: bool,
        include_statistics: bool,
    ) -> Report {
        self.generate_at(
            table,
            title,
            report_type,
            include_charts,
            include_statistics,
            Local::now().naive_local(),
        )
    }

    /// Generate a report with an explicit timestamp.
    pub fn generate_at(
        &self,
        table: &ResultTable,
        title: &str,
        report_type: &str,
        include_charts: bool,
        include_statistics: bool,
        generated_at: NaiveDateTime,
    ) -> Report {
        let report_type = ReportType::from_name(report_type);
        let request = Request {
            table,
            title,
            include_charts,
            include_statistics,
            generated_at,
        };

        match templates::assemble(&self.config, report_type, &request) {
            Ok(report) => {
                info!(
                    report_type = %report_type,
                    sections = report.sections.len(),
                    rows = table.row_count(),
                    "Generated report"
                );
                report
            }
            Err(e) => {
                error!(report_type = %report_type, error = %e, "Failed to generate report");
                Report::error(e.to_string(), generated_at)
            }
        }
    }
}

/// Format an integer with comma thousands separators.
pub(crate) fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
