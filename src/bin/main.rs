//! sqlreport CLI - build SQL, chart results and generate reports
//!
//! Usage:
//!   sqlreport build <selection.json> [--dialect <dialect>] [--db <path>]
//!   sqlreport run <query.sql> --db <path>
//!   sqlreport report <query.sql> --db <path> --title <title> -o report.html
//!
//! Examples:
//!   sqlreport build usage.json --dialect postgres
//!   sqlreport chart usage.sql --db water.db --type bar --x zone --y total
//!   sqlreport report usage.sql --db water.db --type "Executive Summary" -o usage.html

use clap::{Parser, Subcommand, ValueEnum};
use sqlreport::builder::{explain_sql, format_sql, validate, QueryBuilder, Selection};
use sqlreport::chart::{self, create_chart, ChartType, RoleBindings};
use sqlreport::config::Settings;
use sqlreport::executor::{QueryExecutor, SchemaProvider, SqliteExecutor};
use sqlreport::report::{dashboard_html, ReportGenerator};
use sqlreport::sql::Dialect;
use sqlreport::table::ResultTable;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sqlreport")]
#[command(about = "Build SQL visually, chart query results and generate HTML reports")]
#[command(version)]
struct Cli {
    /// Config file (defaults to sqlreport.toml or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build SQL from a selection file
    Build {
        /// Path to the selection JSON
        file: PathBuf,

        /// SQL dialect to generate (defaults to the configured dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Read foreign keys from this database to pick join columns
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print a plain-language explanation after the SQL
        #[arg(long)]
        explain: bool,
    },

    /// Check a selection file without building SQL
    Validate {
        /// Path to the selection JSON
        file: PathBuf,
    },

    /// Format and explain a SQL file
    Explain {
        /// Path to the .sql file
        file: PathBuf,
    },

    /// Run a SQL file and print the rows
    Run {
        /// Path to the .sql file
        file: PathBuf,

        #[arg(long)]
        db: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: RowFormat,
    },

    /// Print the tables and columns of a database
    Schema {
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Build a chart spec from a query's results
    Chart {
        /// Path to the .sql file
        file: PathBuf,

        #[arg(long)]
        db: Option<PathBuf>,

        /// Chart type, e.g. "bar" or "Scatter Plot"
        #[arg(long = "type")]
        chart_type: ChartType,

        #[arg(long)]
        x: Option<String>,

        #[arg(long)]
        y: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        value: Option<String>,

        /// Print a Plotly figure instead of the chart spec
        #[arg(long)]
        plotly: bool,
    },

    /// Suggest charts for a query's results
    Recommend {
        /// Path to the .sql file
        file: PathBuf,

        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Generate an HTML report from a query's results
    Report {
        /// Path to the .sql file
        file: PathBuf,

        #[arg(long)]
        db: Option<PathBuf>,

        /// Report title
        #[arg(long, default_value = "SQL Report")]
        title: String,

        /// Report type: executive summary, detailed analysis or trend report
        #[arg(long = "type", default_value = "Executive Summary")]
        report_type: String,

        #[arg(long)]
        no_charts: bool,

        #[arg(long)]
        no_statistics: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report structure as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Lay out every suggested chart on one HTML page
    Dashboard {
        /// Path to the .sql file
        file: PathBuf,

        #[arg(long)]
        db: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Generic,
    Postgres,
    Mysql,
    Tsql,
    Duckdb,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Generic => Dialect::Generic,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum RowFormat {
    /// Tab-separated with a header row
    Table,
    /// JSON with column types
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlreport=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Build {
            file,
            dialect,
            db,
            explain,
        } => cmd_build(&settings, &file, dialect, db, explain),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Explain { file } => cmd_explain(&file),
        Commands::Run { file, db, format } => cmd_run(&settings, &file, db, format),
        Commands::Schema { db } => cmd_schema(&settings, db),
        Commands::Chart {
            file,
            db,
            chart_type,
            x,
            y,
            color,
            size,
            label,
            value,
            plotly,
        } => {
            let bindings = RoleBindings {
                x,
                y,
                color,
                size,
                label,
                value,
            };
            cmd_chart(&settings, &file, db, chart_type, &bindings, plotly)
        }
        Commands::Recommend { file, db } => cmd_recommend(&settings, &file, db),
        Commands::Report {
            file,
            db,
            title,
            report_type,
            no_charts,
            no_statistics,
            output,
            json,
        } => cmd_report(
            &settings,
            &file,
            db,
            ReportArgs {
                title,
                report_type,
                include_charts: !no_charts,
                include_statistics: !no_statistics,
                json,
            },
            output,
        ),
        Commands::Dashboard { file, db, output } => cmd_dashboard(&settings, &file, db, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Error reading file '{}': {}", path.display(), e))
}

fn read_selection(path: &Path) -> Result<Selection, String> {
    let source = read_file(path)?;
    serde_json::from_str(&source)
        .map_err(|e| format!("Invalid selection in '{}': {}", path.display(), e))
}

/// Open the database from `--db`, falling back to the configured path.
fn open_db(settings: &Settings, db: Option<PathBuf>) -> Result<SqliteExecutor, String> {
    let path = match db {
        Some(path) => path,
        None => settings
            .database_path()
            .map_err(|e| format!("Config error: {}", e))?
            .ok_or("No database given: pass --db or set [database] path in the config")?,
    };
    SqliteExecutor::open(&path).map_err(|e| e.to_string())
}

fn query(settings: &Settings, file: &Path, db: Option<PathBuf>) -> Result<ResultTable, String> {
    let sql = read_file(file)?;
    let executor = open_db(settings, db)?;
    executor
        .execute(&sql)
        .map_err(|e| format!("Query failed: {}", e))
}

fn write_output(output: Option<PathBuf>, content: &str) -> Result<(), String> {
    match output {
        Some(path) => {
            fs::write(&path, content)
                .map_err(|e| format!("Error writing '{}': {}", path.display(), e))?;
            eprintln!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Serialization error: {}", e))
}

// =============================================================================
// Commands
// =============================================================================

fn cmd_build(
    settings: &Settings,
    file: &Path,
    dialect: Option<DialectArg>,
    db: Option<PathBuf>,
    explain: bool,
) -> Result<(), String> {
    let selection = read_selection(file)?;

    let dialect = match dialect {
        Some(arg) => arg.into(),
        None => settings.dialect().map_err(|e| format!("Config error: {}", e))?,
    };
    let mut builder = QueryBuilder::new().with_dialect(dialect);

    if let Some(path) = db {
        let executor = open_db(settings, Some(path))?;
        let relationships = executor
            .relationships()
            .map_err(|e| format!("Failed to read foreign keys: {}", e))?;
        builder = builder.with_relationships(relationships);
    }

    let sql = builder
        .build(&selection)
        .map_err(|e| format!("Validation error: {}", e))?;
    println!("{}", sql);

    if explain {
        println!();
        println!("-- {}", explain_sql(&sql));
    }
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let selection = read_selection(file)?;
    let report = validate(&selection.tables, &selection.columns);

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    if report.is_valid {
        println!("OK: {} is valid", file.display());
        Ok(())
    } else {
        Err(format!("Validation errors:\n  {}", report.errors.join("\n  ")))
    }
}

fn cmd_explain(file: &Path) -> Result<(), String> {
    let sql = read_file(file)?;
    println!("{}", format_sql(&sql));
    println!();
    println!("{}", explain_sql(&sql));
    Ok(())
}

fn cmd_run(settings: &Settings, file: &Path, db: Option<PathBuf>, format: RowFormat) -> Result<(), String> {
    let table = query(settings, file, db)?;

    match format {
        RowFormat::Json => println!("{}", to_json(&table)?),
        RowFormat::Table => {
            println!("{}", table.column_names().join("\t"));
            for row in table.rows() {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                println!("{}", cells.join("\t"));
            }
            eprintln!("({} rows)", table.row_count());
        }
    }
    Ok(())
}

fn cmd_schema(settings: &Settings, db: Option<PathBuf>) -> Result<(), String> {
    let executor = open_db(settings, db)?;
    let schema = executor.schema().map_err(|e| e.to_string())?;

    for (name, table) in &schema {
        println!("{} ({} rows)", name, table.row_count);
        for column in &table.columns {
            let mut flags = Vec::new();
            if column.is_primary_key {
                flags.push("primary key");
            }
            if !column.nullable {
                flags.push("not null");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            println!("  - {} {}{}", column.name, column.data_type, flags);
        }
    }
    Ok(())
}

fn cmd_chart(
    settings: &Settings,
    file: &Path,
    db: Option<PathBuf>,
    chart_type: ChartType,
    bindings: &RoleBindings,
    plotly: bool,
) -> Result<(), String> {
    let table = query(settings, file, db)?;
    let spec = create_chart(&table, chart_type, bindings, &settings.chart)
        .map_err(|e| format!("Chart error: {}", e))?;

    if plotly {
        println!("{}", to_json(&chart::plotly::to_plotly(&spec))?);
    } else {
        println!("{}", to_json(&spec)?);
    }
    Ok(())
}

fn cmd_recommend(settings: &Settings, file: &Path, db: Option<PathBuf>) -> Result<(), String> {
    let table = query(settings, file, db)?;
    let recommendations = chart::recommend(&table);

    if recommendations.is_empty() {
        println!("No chart suggestions for these columns.");
        return Ok(());
    }

    for rec in &recommendations {
        let bindings = serde_json::to_string(&rec.bindings)
            .map_err(|e| format!("Serialization error: {}", e))?;
        println!("- {}: {} {}", rec.chart_type, rec.reason, bindings);
    }
    Ok(())
}

struct ReportArgs {
    title: String,
    report_type: String,
    include_charts: bool,
    include_statistics: bool,
    json: bool,
}

fn cmd_report(
    settings: &Settings,
    file: &Path,
    db: Option<PathBuf>,
    args: ReportArgs,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let table = query(settings, file, db)?;
    let generator = ReportGenerator::new(settings.report_config());
    let report = generator.generate(
        &table,
        &args.title,
        &args.report_type,
        args.include_charts,
        args.include_statistics,
    );

    let content = if args.json {
        to_json(&report)?
    } else {
        report.to_html()
    };
    write_output(output, &content)
}

fn cmd_dashboard(
    settings: &Settings,
    file: &Path,
    db: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let table = query(settings, file, db)?;

    let charts: Vec<_> = chart::recommend(&table)
        .into_iter()
        .filter_map(|rec| create_chart(&table, rec.chart_type, &rec.bindings, &settings.chart).ok())
        .collect();

    let board = chart::dashboard(charts).ok_or("No charts could be built for these columns")?;
    write_output(output, &dashboard_html(&board, &settings.chart))
}
