//! # sqlreport
//!
//! Build SQL from a visual selection, chart the results and assemble reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Selection (tables, columns,              │
//! │        aggregations, filters, group by, order by)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SQL (per dialect)                       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ResultTable                           │
//! └─────────────────────────────────────────────────────────┘
//!                │                            │
//!                ▼ [chart]                    ▼ [report]
//! ┌───────────────────────────┐  ┌──────────────────────────┐
//! │  ChartSpec (declarative)  │  │  Report -> HTML document │
//! └───────────────────────────┘  └──────────────────────────┘
//! ```
//!
//! The builder, chart and report modules are pure: no I/O, no shared state.
//! Query execution is behind the [`executor::QueryExecutor`] trait.

pub mod builder;
pub mod chart;
pub mod config;
pub mod executor;
pub mod report;
pub mod sql;
pub mod table;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::builder::{build, validate, QueryBuilder, Selection, ValidationError};
    pub use crate::chart::{create_chart, ChartSpec, ChartTheme, ChartType, RoleBindings};
    pub use crate::executor::{QueryExecutor, SchemaProvider, SqliteExecutor};
    pub use crate::report::{Report, ReportGenerator};
    pub use crate::sql::Dialect;
    pub use crate::table::{ResultTable, Value};
}
