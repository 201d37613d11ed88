//! Configuration module for sqlreport.
//!
//! Loads the database path, query dialect, chart theme and report settings.

mod settings;

pub use settings::{
    expand_env_vars, DatabaseSettings, QuerySettings, ReportSettings, Settings, SettingsError,
};
