//! Self-contained HTML rendering.
//!
//! Styles are inlined and Plotly is loaded from its CDN. Output depends only
//! on the [`Report`] value, so rendering the same report twice gives the same
//! bytes.

use serde_json::Value as Json;

use super::{
    thousands, DataPreview, InsightsBox, MetaItem, QualityAssessment, Recommendation, Report,
    Section, SectionPayload, StatBlock, StatItem,
};
use crate::chart::plotly::{dashboard_to_plotly, to_plotly};
use crate::chart::{ChartSpec, ChartTheme, Dashboard};
use crate::table::{ResultTable, Value};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const STYLES: &str = r#"
body {
    font-family: 'Segoe UI', Arial, sans-serif;
    line-height: 1.6;
    color: #333;
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
    background-color: #f8f9fa;
}
.report-container {
    background: white;
    padding: 40px;
    border-radius: 10px;
    box-shadow: 0 4px 6px rgba(0,0,0,0.1);
}
.header {
    text-align: center;
    margin-bottom: 40px;
    padding-bottom: 20px;
    border-bottom: 3px solid #007acc;
}
.header h1 {
    color: #007acc;
    font-size: 2.5em;
    margin-bottom: 10px;
}
.header .subtitle {
    color: #666;
    font-size: 1.2em;
}
.meta-info {
    background: #f8f9fa;
    padding: 20px;
    border-radius: 8px;
    margin: 20px 0;
    border-left: 4px solid #007acc;
}
.section {
    margin: 30px 0;
}
.section h2 {
    color: #007acc;
    font-size: 1.8em;
    margin-bottom: 15px;
    padding-bottom: 10px;
    border-bottom: 2px solid #e9ecef;
}
.section h3 {
    color: #495057;
    font-size: 1.4em;
    margin: 20px 0 10px 0;
}
.metric-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 20px;
    margin: 20px 0;
}
.metric-card {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    padding: 20px;
    border-radius: 10px;
    text-align: center;
}
.metric-card .value {
    font-size: 2em;
    font-weight: bold;
    margin-bottom: 5px;
}
.metric-card .label {
    font-size: 0.9em;
    opacity: 0.9;
}
.data-table {
    width: 100%;
    border-collapse: collapse;
    margin: 20px 0;
    background: white;
    border-radius: 8px;
    overflow: hidden;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
.data-table th {
    background: #007acc;
    color: white;
    padding: 15px;
    text-align: left;
    font-weight: 600;
}
.data-table td {
    padding: 12px 15px;
    border-bottom: 1px solid #e9ecef;
}
.data-table tr:nth-child(even) {
    background: #f8f9fa;
}
.data-table tr:hover {
    background: #e3f2fd;
}
.chart-container {
    margin: 30px 0;
    text-align: center;
}
.insights-box {
    background: #e8f5e8;
    border: 1px solid #4caf50;
    border-radius: 8px;
    padding: 20px;
    margin: 20px 0;
}
.insights-box h4 {
    color: #2e7d32;
    margin-top: 0;
}
.footer {
    text-align: center;
    margin-top: 40px;
    padding-top: 20px;
    border-top: 2px solid #e9ecef;
    color: #666;
    font-size: 0.9em;
}
.summary-stats {
    display: flex;
    justify-content: space-around;
    margin: 20px 0;
    flex-wrap: wrap;
}
.stat-item {
    text-align: center;
    margin: 10px;
}
.stat-item .number {
    font-size: 2em;
    font-weight: bold;
    color: #007acc;
}
.stat-item .description {
    color: #666;
    font-size: 0.9em;
}
.recommendation {
    background: #fff3cd;
    border: 1px solid #ffc107;
    border-radius: 8px;
    padding: 15px;
    margin: 15px 0;
}
.recommendation h5 {
    color: #856404;
    margin-top: 0;
}
@media print {
    .no-print {
        display: none;
    }
}
"#;

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// JSON safe to embed in a `<script>` element.
fn script_json(value: &Json) -> String {
    value.to_string().replace("</", "<\\/")
}

fn head(title: &str, with_plotly: bool) -> String {
    let script = if with_plotly {
        format!("<script src=\"{}\"></script>\n", PLOTLY_CDN)
    } else {
        String::new()
    };
    format!(
        "<head>\n<title>{}</title>\n<meta charset=\"utf-8\">\n{}<style>{}</style>\n</head>\n",
        escape_html(title),
        script,
        STYLES
    )
}

// =============================================================================
// Report
// =============================================================================

impl Report {
    /// Render as one HTML document.
    pub fn to_html(&self) -> String {
        if let Some(message) = &self.error {
            return render_error(message);
        }

        let mut next_chart = 1;
        let mut body = String::new();
        for section in &self.sections {
            body.push_str(&render_section(section, &mut next_chart));
        }

        let footer: String = self
            .footer
            .iter()
            .map(|line| format!("<p>{}</p>\n", escape_html(line)))
            .collect();

        format!(
            "<!DOCTYPE html>\n<html>\n{head}<body>\n<div class=\"report-container\">\n\
             <div class=\"header\">\n<h1>{title}</h1>\n<div class=\"subtitle\">{subtitle}</div>\n</div>\n\
             <div class=\"meta-info\">\n{meta}\n</div>\n\
             {body}\
             <div class=\"footer\">\n{footer}</div>\n\
             </div>\n</body>\n</html>\n",
            head = head(&self.title, self.charts().next().is_some()),
            title = escape_html(&self.title),
            subtitle = escape_html(&self.subtitle),
            meta = render_meta(&self.meta),
            body = body,
            footer = footer,
        )
    }
}

fn render_error(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n{head}<body>\n<div class=\"report-container\">\n\
         <div class=\"header\">\n<h1 style=\"color: #dc3545;\">Report Generation Error</h1>\n</div>\n\
         <div class=\"section\">\n<p>An error occurred while generating the report:</p>\n\
         <pre style=\"background: #f8f9fa; padding: 15px; border-radius: 5px;\">{message}</pre>\n\
         </div>\n</div>\n</body>\n</html>\n",
        head = head("Report Generation Error", false),
        message = escape_html(message),
    )
}

fn render_meta(meta: &[MetaItem]) -> String {
    meta.iter()
        .map(|item| {
            format!(
                "<strong>{}:</strong> {}",
                escape_html(&item.label),
                escape_html(&item.value)
            )
        })
        .collect::<Vec<_>>()
        .join("<br>\n")
}

fn render_section(section: &Section, next_chart: &mut usize) -> String {
    let content = match &section.payload {
        SectionPayload::Metrics(cards) => {
            let cards: String = cards
                .iter()
                .map(|card| {
                    format!(
                        "<div class=\"metric-card\">\n<div class=\"value\">{}</div>\n<div class=\"label\">{}</div>\n</div>\n",
                        escape_html(&card.value),
                        escape_html(&card.label)
                    )
                })
                .collect();
            format!("<div class=\"metric-grid\">\n{}</div>\n", cards)
        }
        SectionPayload::Insights(insights) => render_insights(insights),
        SectionPayload::DataPreview(preview) => render_preview(preview),
        SectionPayload::Charts(charts) => {
            let mut out = String::new();
            for chart in charts {
                out.push_str(&render_chart(chart, *next_chart));
                *next_chart += 1;
            }
            out
        }
        SectionPayload::Statistics(blocks) => blocks.iter().map(render_block).collect(),
        SectionPayload::QualityAssessment(quality) => render_quality(quality),
        SectionPayload::Recommendations(recs) => render_recommendations(recs),
    };

    format!(
        "<div class=\"section\">\n<h2>{}</h2>\n{}</div>\n",
        escape_html(&section.title),
        content
    )
}

fn render_insights(insights: &InsightsBox) -> String {
    match &insights.heading {
        Some(heading) => {
            let lines: String = insights
                .lines
                .iter()
                .map(|line| format!("<p>• {}</p>\n", escape_html(line)))
                .collect();
            format!(
                "<div class=\"insights-box\">\n<h4>{}</h4>\n{}</div>\n",
                escape_html(heading),
                lines
            )
        }
        None => insights
            .lines
            .iter()
            .map(|line| format!("<p>{}</p>\n", escape_html(line)))
            .collect(),
    }
}

fn render_preview(preview: &DataPreview) -> String {
    if preview.total_rows == 0 {
        return "<p>No data to display.</p>\n".to_string();
    }

    let mut out = render_table(&preview.table);
    if preview.is_truncated() {
        out.push_str(&format!(
            "<p><em>Showing first {} of {} total records</em></p>\n",
            preview.table.row_count(),
            thousands(preview.total_rows)
        ));
    }
    out
}

fn render_chart(chart: &ChartSpec, n: usize) -> String {
    let figure = to_plotly(chart);
    format!(
        "<div class=\"chart-container\">\n<div id=\"chart{n}\"></div>\n\
         <script>Plotly.newPlot(\"chart{n}\", {data}, {layout}, {{\"responsive\": true}});</script>\n\
         </div>\n",
        n = n,
        data = script_json(&figure["data"]),
        layout = script_json(&figure["layout"]),
    )
}

fn render_block(block: &StatBlock) -> String {
    match block {
        StatBlock::Table { heading, table } => {
            format!("<h3>{}</h3>\n{}", escape_html(heading), render_table(table))
        }
        StatBlock::Items { heading, items } => {
            let heading = heading
                .as_ref()
                .map(|h| format!("<h3>{}</h3>\n", escape_html(h)))
                .unwrap_or_default();
            let items: String = items.iter().map(render_stat_item).collect();
            format!("{}<div class=\"summary-stats\">\n{}</div>\n", heading, items)
        }
        StatBlock::Note { text } => format!("<p>{}</p>\n", escape_html(text)),
    }
}

fn render_stat_item(item: &StatItem) -> String {
    format!(
        "<div class=\"stat-item\">\n<div class=\"number\">{}</div>\n<div class=\"description\">{}</div>\n</div>\n",
        escape_html(&item.number),
        escape_html(&item.description)
    )
}

fn render_quality(quality: &QualityAssessment) -> String {
    let mut out = format!(
        "<div class=\"insights-box\">\n<h4>Data Completeness</h4>\n\
         <p>Overall data completeness: {:.1}%</p>\n\
         <p>Missing values: {} out of {} total cells</p>\n</div>\n",
        quality.completeness,
        thousands(quality.missing_cells),
        thousands(quality.total_cells)
    );

    if !quality.columns.is_empty() {
        let rows = quality
            .columns
            .iter()
            .map(|c| {
                vec![
                    c.column.clone(),
                    c.missing.to_string(),
                    Value::Float(c.percent).to_string(),
                ]
            })
            .collect();
        out.push_str("<h3>Columns with Missing Data</h3>\n");
        out.push_str(&table_html(
            &["Column", "Missing Count", "Missing %"].map(String::from),
            rows,
        ));
    }
    out
}

fn render_recommendations(recs: &[Recommendation]) -> String {
    if recs.is_empty() {
        return "<p>No recommendations available for empty dataset.</p>\n".to_string();
    }
    recs.iter()
        .map(|rec| {
            format!(
                "<div class=\"recommendation\">\n<h5>{}</h5>\n<p>{}</p>\n</div>\n",
                escape_html(&rec.title),
                escape_html(&rec.content)
            )
        })
        .collect()
}

fn render_table(table: &ResultTable) -> String {
    let headers: Vec<String> = table.column_names().into_iter().map(String::from).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();
    table_html(&headers, rows)
}

fn table_html(headers: &[String], rows: Vec<Vec<String>>) -> String {
    let mut html = String::from("<table class=\"data-table\">\n<thead><tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

// =============================================================================
// Dashboard
// =============================================================================

/// Render a dashboard as its own HTML page.
pub fn dashboard_html(dashboard: &Dashboard, theme: &ChartTheme) -> String {
    let figure = dashboard_to_plotly(dashboard, theme);
    format!(
        "<!DOCTYPE html>\n<html>\n{head}<body>\n<div class=\"report-container\">\n\
         <div class=\"chart-container\">\n<div id=\"dashboard\"></div>\n\
         <script>Plotly.newPlot(\"dashboard\", {data}, {layout}, {{\"responsive\": true}});</script>\n\
         </div>\n</div>\n</body>\n</html>\n",
        head = head(&dashboard.title, true),
        data = script_json(&figure["data"]),
        layout = script_json(&figure["layout"]),
    )
}
