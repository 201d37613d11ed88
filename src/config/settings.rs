//! TOML-based configuration for sqlreport.
//!
//! Supports a config file (sqlreport.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [database]
//! path = "${DATA_DIR}/water.db"
//!
//! [query]
//! dialect = "postgres"
//!
//! [chart]
//! height = 600
//! palette = ["#1f77b4", "#ff7f0e"]
//!
//! [report]
//! executive_preview_rows = 10
//! detailed_preview_rows = 50
//! large_dataset_threshold = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chart::ChartTheme;
use crate::report::ReportConfig;
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub query: QuerySettings,
    /// Chart theme overrides.
    pub chart: ChartTheme,
    pub report: ReportSettings,
}

/// Database to run queries against.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite database path (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// SQL dialect for generated queries.
    pub dialect: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            dialect: "generic".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    pub executive_preview_rows: usize,
    pub detailed_preview_rows: usize,
    /// Row count above which sampling is recommended.
    pub large_dataset_threshold: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        let defaults = ReportConfig::default();
        Self {
            executive_preview_rows: defaults.executive_preview_rows,
            detailed_preview_rows: defaults.detailed_preview_rows,
            large_dataset_threshold: defaults.large_dataset_threshold,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.check()?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLREPORT_CONFIG`
    /// 2. `./sqlreport.toml`
    /// 3. `~/.config/sqlreport/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLREPORT_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlreport.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlreport").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject values that parse but cannot be used.
    fn check(&self) -> Result<(), SettingsError> {
        self.dialect()?;
        if self.report.executive_preview_rows == 0 || self.report.detailed_preview_rows == 0 {
            return Err(SettingsError::InvalidConfig(
                "preview row counts must be positive".to_string(),
            ));
        }
        if self.chart.palette.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "chart palette must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured dialect.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        self.query
            .dialect
            .parse()
            .map_err(|_| SettingsError::InvalidConfig(format!("unknown dialect '{}'", self.query.dialect)))
    }

    /// Database path with environment variables expanded.
    pub fn database_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.database
            .path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            theme: self.chart.clone(),
            executive_preview_rows: self.report.executive_preview_rows,
            detailed_preview_rows: self.report.detailed_preview_rows,
            large_dataset_threshold: self.report.large_dataset_threshold,
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
