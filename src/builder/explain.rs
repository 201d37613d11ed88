//! Plain-text helpers for SQL shown to the user: a one-line explanation and
//! a line-breaking formatter.
//!
//! Both work on raw text with keyword matching. Neither parses SQL.

use std::sync::LazyLock;

use regex::Regex;

/// Keywords that start a new line, longest alternatives first so
/// `LEFT JOIN` is not split at `JOIN`.
const CLAUSE_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LEFT JOIN",
    "RIGHT JOIN",
    "INNER JOIN",
    "JOIN",
    "UNION",
];

static CLAUSE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = CLAUSE_KEYWORDS
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"[ \t]+({}) ", alternatives)).expect("clause keyword regex")
});

/// Describe what a query does in a sentence or two.
///
/// ```
/// use sqlreport::builder::explain_sql;
///
/// let text = explain_sql("SELECT SUM(usage) FROM readings GROUP BY zone");
/// assert_eq!(text, "This query performs aggregation calculations. Groups results for aggregation.");
/// ```
pub fn explain_sql(sql: &str) -> String {
    let lower = sql.to_lowercase();
    let mut parts: Vec<&str> = Vec::new();

    if lower.contains("select") {
        if ["sum(", "count(", "avg("].iter().any(|f| lower.contains(f)) {
            parts.push("This query performs aggregation calculations");
        }
        if lower.contains("distinct") {
            parts.push("Returns only unique values");
        }
    }

    if lower.contains("join") {
        parts.push("Combines data from multiple tables");
    }

    if lower.contains("where") {
        parts.push("Filters data based on specific conditions");
    }

    if lower.contains("group by") {
        parts.push("Groups results for aggregation");
    }

    if lower.contains("order by") {
        if lower.contains("desc") {
            parts.push("Results sorted in descending order");
        } else {
            parts.push("Results sorted in ascending order");
        }
    }

    if parts.is_empty() {
        parts.push("Basic data selection query");
    }

    format!("{}.", parts.join(". "))
}

/// Put each major clause on its own line and indent continuation lines by
/// four spaces. Keyword matching is case-sensitive.
pub fn format_sql(sql: &str) -> String {
    let broken = CLAUSE_BREAK.replace_all(sql.trim(), "\n$1 ");

    broken
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if CLAUSE_KEYWORDS.iter().any(|kw| line.starts_with(kw)) {
                line.to_string()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
